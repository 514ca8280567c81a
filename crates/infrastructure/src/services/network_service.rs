use std::sync::Arc;

use chainrest_core::{ApiNodeConfig, FeeStatsConfig, NetworkResult};
use chainrest_domain::fees::max_difficulty_blocks;
use chainrest_domain::{
    BlockRepository, InflationPointView, InflationSchedule, NetworkProperties, PropertyDocument,
    RentalFees, TransactionFeeStats,
};
use tracing::{debug, instrument};

use crate::file_cache::FileCache;

/// 网络属性服务
///
/// 组合文件缓存、属性解析、通胀计划与费用统计，生成各网络接口的响应数据。
/// - 网络属性文件与通胀文件只解析一次
/// - 节点属性文件在修改时间前进时重新解析
pub struct NetworkService {
    files: ApiNodeConfig,
    fees: FeeStatsConfig,
    documents: FileCache<PropertyDocument>,
    schedules: FileCache<InflationSchedule>,
    blocks: Arc<dyn BlockRepository>,
}

impl NetworkService {
    pub fn new(files: ApiNodeConfig, fees: FeeStatsConfig, blocks: Arc<dyn BlockRepository>) -> Self {
        Self {
            files,
            fees,
            documents: FileCache::new(),
            schedules: FileCache::new(),
            blocks,
        }
    }

    async fn network_document(&self) -> NetworkResult<Arc<PropertyDocument>> {
        let document = self
            .documents
            .read_once(&self.files.network_property_file_path, PropertyDocument::parse)
            .await?;
        Ok(document)
    }

    async fn node_document(&self) -> NetworkResult<Arc<PropertyDocument>> {
        let document = self
            .documents
            .read_newer(&self.files.node_property_file_path, PropertyDocument::parse)
            .await?;
        Ok(document)
    }

    async fn inflation_schedule(&self) -> NetworkResult<Arc<InflationSchedule>> {
        let schedule = self
            .schedules
            .read_once(&self.files.inflation_property_file_path, InflationSchedule::parse)
            .await?;
        Ok(schedule)
    }

    #[instrument(skip(self))]
    pub async fn network_properties(&self) -> NetworkResult<NetworkProperties> {
        let document = self.network_document().await?;
        NetworkProperties::resolve(&document)
    }

    #[instrument(skip(self))]
    pub async fn inflation_points(&self) -> NetworkResult<Vec<InflationPointView>> {
        Ok(self.inflation_schedule().await?.views())
    }

    #[instrument(skip(self))]
    pub async fn inflation_at(&self, height: u64) -> NetworkResult<InflationPointView> {
        self.inflation_schedule().await?.view_at(height)
    }

    #[instrument(skip(self))]
    pub async fn transaction_fees(&self) -> NetworkResult<TransactionFeeStats> {
        let count = self.fees.effective_num_blocks();

        let (node, samples, network) = tokio::try_join!(
            self.node_document(),
            self.blocks.latest_blocks_fee_multiplier(count),
            self.network_document(),
        )?;

        debug!("交易费用统计样本数: {}", samples.len());
        TransactionFeeStats::compute(&samples, &network, &node)
    }

    #[instrument(skip(self))]
    pub async fn rental_fees(&self) -> NetworkResult<RentalFees> {
        let network = self.network_document().await?;
        let count = max_difficulty_blocks(&network)?;

        let samples = self.blocks.latest_blocks_fee_multiplier(count).await?;
        debug!("租赁费用统计样本数: {}", samples.len());
        RentalFees::compute(&samples, &network)
    }
}
