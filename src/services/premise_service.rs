//! 车场查询服务

use crate::{
    error::AppError,
    gateway::{ApiGateway, ApiRequest},
    models::premise::{filter_premises, group_by_city, Premise},
};
use std::sync::Arc;

pub const PREMISES_PATH: &str = "/premises/";

pub struct PremiseService {
    gateway: Arc<ApiGateway>,
}

impl PremiseService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// 获取全部车场
    pub async fn fetch_premises(&self) -> Result<Vec<Premise>, AppError> {
        let response = self.gateway.send(ApiRequest::get(PREMISES_PATH)).await?;
        let premises: Vec<Premise> = response.json()?;
        tracing::debug!(count = premises.len(), "Premises fetched");
        Ok(premises)
    }

    /// 获取支持城市内的车场，按城市和搜索词过滤
    pub async fn search(&self, city: Option<&str>, term: &str) -> Result<Vec<Premise>, AppError> {
        let grouped = group_by_city(self.fetch_premises().await?);
        Ok(filter_premises(&grouped, city, term)
            .into_iter()
            .cloned()
            .collect())
    }

    /// 按 id 查找车场
    pub async fn find(&self, premise_id: i64) -> Result<Premise, AppError> {
        self.fetch_premises()
            .await?
            .into_iter()
            .find(|premise| premise.id == premise_id)
            .ok_or_else(|| AppError::api(404, format!("Premise {} not found", premise_id)))
    }
}
