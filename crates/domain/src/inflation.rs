//! 通胀计划
//!
//! `[inflation]` 段的每一项形如 `starting-at-height-<height> = <reward>`，
//! 高度取最后一个 `-` 之后的部分。

use chainrest_core::{NetworkError, NetworkResult};
use serde::Serialize;

use crate::properties::PropertyDocument;

pub const INFLATION_SECTION: &str = "inflation";

/// 通胀拐点
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InflectionPoint {
    pub start_height: u64,
    pub reward_amount: u64,
}

/// 对外视图，数值以十进制字符串输出
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationPointView {
    pub start_height: String,
    pub reward_amount: String,
}

impl InflationPointView {
    /// 查询高度早于首个拐点时的返回值
    pub fn not_applicable() -> Self {
        Self {
            start_height: "N/A".to_string(),
            reward_amount: "0".to_string(),
        }
    }
}

impl From<&InflectionPoint> for InflationPointView {
    fn from(point: &InflectionPoint) -> Self {
        Self {
            start_height: point.start_height.to_string(),
            reward_amount: point.reward_amount.to_string(),
        }
    }
}

/// 按起始高度升序排列的拐点序列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InflationSchedule {
    points: Vec<InflectionPoint>,
}

impl InflationSchedule {
    pub fn new(mut points: Vec<InflectionPoint>) -> Self {
        // 稳定排序，同高度保持文件中的先后
        points.sort_by_key(|point| point.start_height);
        Self { points }
    }

    pub fn parse(text: &str) -> NetworkResult<Self> {
        Self::from_document(&PropertyDocument::parse(text)?)
    }

    pub fn from_document(document: &PropertyDocument) -> NetworkResult<Self> {
        let section = document.require_section(INFLATION_SECTION)?;

        let points = section
            .iter()
            .map(|(key, reward)| {
                let height = key.rsplit('-').next().unwrap_or(key.as_str()).trim();
                Ok(InflectionPoint {
                    start_height: parse_u64(height)?,
                    reward_amount: parse_u64(reward)?,
                })
            })
            .collect::<NetworkResult<Vec<_>>>()?;

        Ok(Self::new(points))
    }

    pub fn points(&self) -> &[InflectionPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 查询给定高度适用的拐点
    ///
    /// 返回最后一个 `start_height <= height` 的拐点；早于首个拐点时返回 `None`。
    /// 空计划视为错误。
    pub fn reward_at(&self, height: u64) -> NetworkResult<Option<&InflectionPoint>> {
        if self.points.is_empty() {
            return Err(NetworkError::EmptySchedule);
        }

        let upper = self.points.partition_point(|point| point.start_height <= height);
        Ok(upper.checked_sub(1).map(|index| &self.points[index]))
    }

    pub fn view_at(&self, height: u64) -> NetworkResult<InflationPointView> {
        Ok(self
            .reward_at(height)?
            .map(InflationPointView::from)
            .unwrap_or_else(InflationPointView::not_applicable))
    }

    pub fn views(&self) -> Vec<InflationPointView> {
        self.points.iter().map(InflationPointView::from).collect()
    }
}

fn parse_u64(value: &str) -> NetworkResult<u64> {
    let value = value.trim();
    value
        .parse::<u64>()
        .map_err(|e| NetworkError::invalid_number(value, e))
}
