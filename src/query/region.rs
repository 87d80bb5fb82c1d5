//! Region Resolution
//!
//! Some providers publish images per environment (a named group of regions)
//! rather than per region. The resolver maps a region requested by a client
//! to the environment that owns it.

use crate::framework::Provider;

/// Environment name owning `region`, or `region` itself when the provider
/// has no environments or none of them lists the region
pub fn environment_for<'a>(provider: &'a Provider, region: &'a str) -> &'a str {
    provider
        .environments()
        .iter()
        .find(|env| env.contains_region(region))
        .map(|env| env.name.as_str())
        .unwrap_or(region)
}

/// True iff the provider defines at least one environment
pub fn has_environments(provider: &Provider) -> bool {
    provider.has_environments()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::document::parse;

    fn provider(xml: &str) -> Provider {
        Provider::from_document("test", &parse(xml).unwrap())
    }

    #[test]
    fn test_region_resolves_to_environment() {
        let p = provider(
            r#"<framework><environments>
                 <environment name="us-west"><region name="us-west-2"/></environment>
                 <environment name="us-east"><region name="us-east-1"/></environment>
               </environments></framework>"#,
        );
        assert!(has_environments(&p));
        assert_eq!(environment_for(&p, "us-west-2"), "us-west");
        assert_eq!(environment_for(&p, "us-east-1"), "us-east");
    }

    #[test]
    fn test_unknown_region_passes_through() {
        let p = provider(
            r#"<framework><environments>
                 <environment name="us-west"><region name="us-west-2"/></environment>
               </environments></framework>"#,
        );
        assert_eq!(environment_for(&p, "eu-central-1"), "eu-central-1");
    }

    #[test]
    fn test_flat_provider_passes_through() {
        let p = provider(
            r#"<framework><regions><region name="us-west-2"/></regions></framework>"#,
        );
        assert!(!has_environments(&p));
        assert_eq!(environment_for(&p, "us-west-2"), "us-west-2");
    }

    #[test]
    fn test_first_environment_wins() {
        let p = provider(
            r#"<framework><environments>
                 <environment name="a"><region name="shared"/></environment>
                 <environment name="b"><region name="shared"/></environment>
               </environments></framework>"#,
        );
        assert_eq!(environment_for(&p, "shared"), "a");
    }
}
