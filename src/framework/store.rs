//! Framework Store
//!
//! Holds every provider's servers, images, regions and environments. The
//! store is built once at startup and never mutated afterwards, so it is
//! shared between requests without locking.

use super::document::Node;
use super::record::Record;
use crate::query::Category;
use std::collections::{BTreeMap, BTreeSet};

/// Region grouping used by providers that publish images per environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    pub regions: Vec<Record>,
}

impl Environment {
    /// Whether a region entry of this environment carries the given name
    pub fn contains_region(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r.get("name") == Some(region))
    }
}

/// Everything one framework document says about a provider
#[derive(Debug, Clone, Default)]
pub struct Provider {
    pub name: String,
    servers: Vec<Record>,
    images: Vec<Record>,
    regions: Vec<Record>,
    environments: Vec<Environment>,
    region_index: Vec<String>,
    servers_version: Option<String>,
    images_version: Option<String>,
}

impl Provider {
    /// Build a provider from the root of its framework document
    pub fn from_document(name: &str, root: &Node) -> Self {
        let mut provider = Provider {
            name: name.to_string(),
            ..Default::default()
        };

        provider.servers_version = grouping_version(root, "servers");
        provider.images_version = grouping_version(root, "images");
        provider.collect(root);
        provider.region_index = provider.build_region_index();

        provider
    }

    fn collect(&mut self, node: &Node) {
        match node.tag.as_str() {
            "server" => self.servers.push(node.to_record()),
            "image" => self.images.push(node.to_record()),
            "region" => self.regions.push(node.to_record()),
            // Regions below an environment belong to it, not to the flat list
            "environment" => {
                self.environments.push(Environment {
                    name: node.get("name").unwrap_or_default().to_string(),
                    regions: node.descendants("region").into_iter().map(Node::to_record).collect(),
                });
                return;
            }
            _ => {}
        }

        for child in &node.children {
            self.collect(child);
        }
    }

    /// Sorted, de-duplicated region identifiers known for this provider
    fn build_region_index(&self) -> Vec<String> {
        let mut index = BTreeSet::new();

        let named = self
            .regions
            .iter()
            .chain(self.environments.iter().flat_map(|env| env.regions.iter()))
            .filter_map(|r| r.get("name"));
        let attributed = self
            .servers
            .iter()
            .chain(self.images.iter())
            .filter_map(|r| r.get("region"));

        for region in named.chain(attributed) {
            if !region.is_empty() {
                index.insert(region.to_string());
            }
        }

        index.into_iter().collect()
    }

    pub fn servers(&self) -> &[Record] {
        &self.servers
    }

    pub fn images(&self) -> &[Record] {
        &self.images
    }

    /// Records of one category
    pub fn records(&self, category: Category) -> &[Record] {
        match category {
            Category::Servers => &self.servers,
            Category::Images => &self.images,
        }
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    /// True iff the provider groups its regions into environments
    pub fn has_environments(&self) -> bool {
        !self.environments.is_empty()
    }

    /// Region index (sorted, unique)
    pub fn regions(&self) -> &[String] {
        &self.region_index
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.region_index
            .binary_search_by(|r| r.as_str().cmp(region))
            .is_ok()
    }

    /// Version attribute of the category's grouping element
    pub fn data_version(&self, category: Category) -> Option<&str> {
        match category {
            Category::Servers => self.servers_version.as_deref(),
            Category::Images => self.images_version.as_deref(),
        }
    }

    /// Distinct server types in document order, reduced to their leading
    /// hyphen segment (`smt-sles` lists as `smt`)
    pub fn server_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for server in &self.servers {
            let Some(server_type) = server.get("type") else {
                continue;
            };
            let base = server_type.split('-').next().unwrap_or(server_type);
            if !base.is_empty() && !types.contains(&base) {
                types.push(base);
            }
        }
        types
    }
}

fn grouping_version(root: &Node, tag: &str) -> Option<String> {
    root.descendants(tag)
        .into_iter()
        .find_map(|group| group.get("version"))
        .map(str::to_string)
}

/// Immutable per-provider framework data
#[derive(Debug, Clone, Default)]
pub struct FrameworkStore {
    providers: BTreeMap<String, Provider>,
}

impl FrameworkStore {
    /// Build the store from already parsed documents, one per provider.
    ///
    /// A provider name seen twice keeps the first document.
    pub fn load<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = (S, Node)>,
        S: AsRef<str>,
    {
        let mut providers = BTreeMap::new();

        for (name, root) in sources {
            let name = name.as_ref();
            if providers.contains_key(name) {
                tracing::warn!("Duplicate framework for provider '{}', ignoring", name);
                continue;
            }

            let provider = Provider::from_document(name, &root);
            tracing::info!(
                "Loaded provider {}: {} servers, {} images, {} regions, {} environments",
                name,
                provider.servers.len(),
                provider.images.len(),
                provider.region_index.len(),
                provider.environments.len()
            );
            providers.insert(name.to_string(), provider);
        }

        Self { providers }
    }

    /// Provider names, sorted
    pub fn providers(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    pub fn provider(&self, name: &str) -> Option<&Provider> {
        self.providers.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn servers(&self, provider: &str) -> Option<&[Record]> {
        self.provider(provider).map(Provider::servers)
    }

    pub fn images(&self, provider: &str) -> Option<&[Record]> {
        self.provider(provider).map(Provider::images)
    }

    pub fn has_environments(&self, provider: &str) -> bool {
        self.provider(provider)
            .is_some_and(Provider::has_environments)
    }

    pub fn regions(&self, provider: &str) -> Option<&[String]> {
        self.provider(provider).map(Provider::regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::document::parse;

    fn amazon() -> Node {
        parse(
            r#"<framework>
              <servers version="1.5">
                <server type="smt-sles" name="smt-1" region="us-east-1"/>
                <server type="regionserver" name="rs-1" region="eu-west-1"/>
                <server type="smt-sap" name="smt-2" region="us-east-1"/>
              </servers>
              <images>
                <image name="sles-15" state="active" region="ap-south-1"/>
                <image name="sles-12" state="deprecated" region="us-east-1"/>
              </images>
            </framework>"#,
        )
        .unwrap()
    }

    fn microsoft() -> Node {
        parse(
            r#"<framework>
              <servers>
                <server type="smt" name="smt-w" region="westus"/>
              </servers>
              <images>
                <image name="sles-15" state="active" environment="PublicAzure"/>
              </images>
              <environments>
                <environment name="PublicAzure">
                  <region name="westus"/>
                  <region name="eastus"/>
                </environment>
                <environment name="China">
                  <region name="chinanorth"/>
                </environment>
              </environments>
            </framework>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_load_partitions_records() {
        let store = FrameworkStore::load([("amazon", amazon())]);
        assert_eq!(store.providers(), vec!["amazon"]);
        assert_eq!(store.servers("amazon").unwrap().len(), 3);
        assert_eq!(store.images("amazon").unwrap().len(), 2);
        assert!(!store.has_environments("amazon"));
        assert!(store.servers("google").is_none());
    }

    #[test]
    fn test_region_index_sorted_and_unique() {
        let store = FrameworkStore::load([("amazon", amazon())]);
        assert_eq!(
            store.regions("amazon").unwrap(),
            &["ap-south-1", "eu-west-1", "us-east-1"]
        );
    }

    #[test]
    fn test_environment_regions_are_indexed() {
        let store = FrameworkStore::load([("microsoft", microsoft())]);
        let provider = store.provider("microsoft").unwrap();
        assert!(provider.has_environments());
        assert_eq!(provider.environments().len(), 2);
        assert_eq!(provider.regions(), &["chinanorth", "eastus", "westus"]);
        assert!(provider.has_region("eastus"));
        assert!(!provider.has_region("PublicAzure"));
    }

    #[test]
    fn test_environment_regions_are_not_flat_regions() {
        let store = FrameworkStore::load([("microsoft", microsoft())]);
        let provider = store.provider("microsoft").unwrap();
        assert!(provider.regions.is_empty());
        assert_eq!(provider.environments()[0].regions.len(), 2);
    }

    #[test]
    fn test_server_types_reduced_to_base() {
        let store = FrameworkStore::load([("amazon", amazon())]);
        assert_eq!(
            store.provider("amazon").unwrap().server_types(),
            vec!["smt", "regionserver"]
        );
    }

    #[test]
    fn test_data_version() {
        let store = FrameworkStore::load([("amazon", amazon())]);
        let provider = store.provider("amazon").unwrap();
        assert_eq!(provider.data_version(Category::Servers), Some("1.5"));
        assert_eq!(provider.data_version(Category::Images), None);
    }

    #[test]
    fn test_duplicate_provider_keeps_first() {
        let store = FrameworkStore::load([("amazon", amazon()), ("amazon", microsoft())]);
        assert_eq!(store.servers("amazon").unwrap().len(), 3);
    }

    #[test]
    fn test_providers_sorted() {
        let store = FrameworkStore::load([("microsoft", microsoft()), ("amazon", amazon())]);
        assert_eq!(store.providers(), vec!["amazon", "microsoft"]);
    }
}
