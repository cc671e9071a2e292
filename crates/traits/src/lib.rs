pub mod resource;

pub use resource::{
    InMemoryResourceResolver, RESOURCE_PREFIX, ResourceError, ResourceResolver, normalize_lexically,
    resolve_against,
};
