pub mod cache;
pub mod client;
pub mod controller;
pub mod error;
pub mod models;
pub mod request;
pub mod summary;

// Re-export commonly used types
pub use cache::CachedResearchService;
pub use client::{HttpResearchService, ResearchService};
pub use controller::{ResearchController, ResearchPhase};
pub use error::{ResearchError, Result};
pub use models::{
    BuyerId, BuyerProspect, Contact, ProspectStatus, ResearchRequest, ResearchResult,
    ServiceMode, ServiceStatus, SourceCompanyProfile,
};
pub use request::{capitalize_first, company_name_from_url};
pub use summary::DiscoverySummary;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EchoService;

    #[async_trait]
    impl ResearchService for EchoService {
        async fn discover_buyers(&self, request: &ResearchRequest) -> Result<ResearchResult> {
            Ok(ResearchResult {
                source_company: SourceCompanyProfile {
                    name: Some(request.company_name.clone()),
                    url: Some(request.company_website.clone()),
                    ..Default::default()
                },
                ideal_customer_profile: None,
                discovered_buyers: vec![],
            })
        }

        async fn status(&self) -> Result<ServiceStatus> {
            Ok(ServiceStatus {
                mode: ServiceMode::Mock,
                message: Some("canned research data".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_submit_and_read_back() {
        let controller = ResearchController::new(Arc::new(EchoService));

        controller.submit("https://www.acme.com/about").await.unwrap();

        assert_eq!(controller.phase(), ResearchPhase::Succeeded);
        let result = controller.result().unwrap();
        assert_eq!(result.source_company.name.as_deref(), Some("Acme"));
        assert_eq!(controller.summary().unwrap().total_buyers, 0);
    }

    #[tokio::test]
    async fn test_status_probe() {
        let status = EchoService.status().await.unwrap();
        assert_eq!(status.mode, ServiceMode::Mock);
        assert_eq!(status.message.as_deref(), Some("canned research data"));
    }
}
