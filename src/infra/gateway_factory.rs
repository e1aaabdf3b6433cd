use crate::app::ports::SeedApiPort;
use crate::config::SeedConfig;
use crate::error::Result;
use crate::infra::http_client::GatewayClient;
use crate::infra::legacy_gateway::LegacyGateway;
use crate::infra::multipart_gateway::MultipartGateway;
use crate::types::Flavor;

/// Build the backend adapter for the configured flavor.
pub fn for_config(config: &SeedConfig) -> Result<Box<dyn SeedApiPort>> {
    let http = GatewayClient::new(config.base_url(), config.request_timeout())?;
    Ok(match config.flavor {
        Flavor::Legacy => Box::new(LegacyGateway::new(http)),
        Flavor::Multipart => Box::new(MultipartGateway::new(http)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_adapter_by_flavor() {
        let mut config = SeedConfig::default();
        config.flavor = Flavor::Legacy;
        assert_eq!(for_config(&config).unwrap().flavor(), Flavor::Legacy);
        config.flavor = Flavor::Multipart;
        assert_eq!(for_config(&config).unwrap().flavor(), Flavor::Multipart);
    }
}
