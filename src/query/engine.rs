//! Query Engine
//!
//! Turns a provider, a category and optional region/type/state filters into
//! an ordered result set. Filters are always applied in the same order:
//! category selection, then type or state, then region or environment.

use super::filters::{clear_region, in_environment, in_region, in_state, of_type, set_region};
use super::region::environment_for;
use crate::framework::{borrow_all, Provider, RecordSet};

/// Record categories served per provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Servers,
    Images,
}

impl Category {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "servers" => Some(Self::Servers),
            "images" => Some(Self::Images),
            _ => None,
        }
    }

    /// Collection name, also the root element of responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Servers => "servers",
            Self::Images => "images",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional filters of a category query
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceQuery<'q> {
    pub region: Option<&'q str>,
    pub server_type: Option<&'q str>,
    pub image_state: Option<&'q str>,
}

impl<'q> ResourceQuery<'q> {
    pub fn in_region(mut self, region: &'q str) -> Self {
        self.region = Some(region);
        self
    }

    pub fn of_type(mut self, server_type: &'q str) -> Self {
        self.server_type = Some(server_type);
        self
    }

    pub fn in_state(mut self, state: &'q str) -> Self {
        self.image_state = Some(state);
        self
    }
}

/// Run a category query against one provider.
///
/// `server_type` only applies to servers and `image_state` only to images.
/// Never fails: an empty set is a valid answer.
pub fn resolve<'a>(
    provider: &'a Provider,
    category: Category,
    query: &ResourceQuery<'_>,
) -> RecordSet<'a> {
    let mut records = borrow_all(provider.records(category));

    match (category, query.server_type, query.image_state) {
        (Category::Servers, Some(server_type), _) => records = of_type(records, server_type),
        (Category::Images, _, Some(state)) => records = in_state(records, state),
        _ => {}
    }

    let records = scope_to_region(provider, category, records, query.region);

    tracing::debug!(
        "Query {}/{} region={:?} type={:?} state={:?}: {} records",
        provider.name,
        category,
        query.region,
        query.server_type,
        query.image_state,
        records.len()
    );

    records
}

/// Apply the region rules of a category query to an already filtered set.
///
/// Images of environment-grouped providers are matched on the environment
/// owning the region and then presented under the requested region; without
/// a region they lose their region attribute. Everything else filters on the
/// region attribute directly.
pub fn scope_to_region<'a>(
    provider: &Provider,
    category: Category,
    records: RecordSet<'a>,
    region: Option<&str>,
) -> RecordSet<'a> {
    let by_environment = category == Category::Images && provider.has_environments();

    match region {
        None if by_environment => clear_region(records),
        None => records,
        Some(region) if by_environment => {
            let environment = environment_for(provider, region);
            set_region(in_environment(records, environment), region)
        }
        Some(region) => in_region(records, region),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::document::parse;

    fn amazon() -> Provider {
        let root = parse(
            r#"<framework>
              <servers>
                <server type="smt-sles" name="smt-1" region="us-east-1"/>
                <server type="regionserver" name="rs-1" region="us-east-1"/>
                <server type="smt-sap" name="smt-2" region="eu-west-1"/>
              </servers>
              <images>
                <image name="img-1" state="active" region="us-east-1"/>
                <image name="img-2" state="deprecated" region="us-east-1"/>
                <image name="img-3" state="active" region="eu-west-1"/>
              </images>
            </framework>"#,
        )
        .unwrap();
        Provider::from_document("amazon", &root)
    }

    fn grouped() -> Provider {
        let root = parse(
            r#"<framework>
              <servers>
                <server type="smt" name="smt-w" region="us-west-2"/>
              </servers>
              <images>
                <image name="img-a" state="active" environment="us-west" region="somewhere"/>
                <image name="img-b" state="inactive" environment="us-west"/>
                <image name="img-c" state="active" environment="us-east"/>
              </images>
              <environments>
                <environment name="us-west"><region name="us-west-2"/></environment>
                <environment name="us-east"><region name="us-east-1"/></environment>
              </environments>
            </framework>"#,
        )
        .unwrap();
        Provider::from_document("amazon", &root)
    }

    fn names(set: &RecordSet<'_>) -> Vec<String> {
        set.iter().map(|r| r.name().to_string()).collect()
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::from_name("servers"), Some(Category::Servers));
        assert_eq!(Category::from_name("images"), Some(Category::Images));
        assert_eq!(Category::from_name("disks"), None);
        assert_eq!(Category::Servers.to_string(), "servers");
    }

    #[test]
    fn test_category_only_returns_everything() {
        let p = amazon();
        let set = resolve(&p, Category::Servers, &ResourceQuery::default());
        assert_eq!(names(&set), vec!["smt-1", "rs-1", "smt-2"]);
    }

    #[test]
    fn test_category_and_region() {
        let p = amazon();
        let set = resolve(&p, Category::Images, &ResourceQuery::default().in_region("us-east-1"));
        assert_eq!(names(&set), vec!["img-1", "img-2"]);
    }

    #[test]
    fn test_servers_by_type_and_region() {
        let p = amazon();
        let set = resolve(&p, Category::Servers, &ResourceQuery::default().of_type("smt"));
        assert_eq!(names(&set), vec!["smt-1", "smt-2"]);

        let query = ResourceQuery::default().of_type("smt").in_region("eu-west-1");
        let set = resolve(&p, Category::Servers, &query);
        assert_eq!(names(&set), vec!["smt-2"]);
    }

    #[test]
    fn test_images_by_state() {
        let p = amazon();
        let set = resolve(&p, Category::Images, &ResourceQuery::default().in_state("active"));
        assert_eq!(names(&set), vec!["img-1", "img-3"]);
    }

    #[test]
    fn test_grouped_images_listing_clears_region() {
        let p = grouped();
        let set = resolve(&p, Category::Images, &ResourceQuery::default());
        assert_eq!(set.len(), 3);
        assert!(set.iter().all(|r| r.get("region").is_none()));
        assert_eq!(p.images()[0].get("region"), Some("somewhere"));
    }

    #[test]
    fn test_grouped_images_by_region_and_state() {
        let p = grouped();
        let query = ResourceQuery::default().in_region("us-west-2").in_state("active");
        let set = resolve(&p, Category::Images, &query);
        assert_eq!(names(&set), vec!["img-a"]);
        assert_eq!(set[0].get("region"), Some("us-west-2"));
        assert_eq!(set[0].get("environment"), Some("us-west"));
    }

    #[test]
    fn test_grouped_images_by_region_stamps_every_result() {
        let p = grouped();
        let set = resolve(&p, Category::Images, &ResourceQuery::default().in_region("us-west-2"));
        assert_eq!(names(&set), vec!["img-a", "img-b"]);
        assert!(set.iter().all(|r| r.get("region") == Some("us-west-2")));
    }

    #[test]
    fn test_grouped_servers_filter_on_region() {
        let p = grouped();
        let set = resolve(&p, Category::Servers, &ResourceQuery::default().in_region("us-west-2"));
        assert_eq!(names(&set), vec!["smt-w"]);
        let set = resolve(&p, Category::Servers, &ResourceQuery::default());
        assert_eq!(set[0].get("region"), Some("us-west-2"));
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let p = amazon();
        let set = resolve(&p, Category::Images, &ResourceQuery::default().in_state("deleted"));
        assert!(set.is_empty());
    }
}
