//! Keyspace helpers: every cache key and invalidation pattern used by the
//! registry's read paths is constructed here so naming stays consistent.

use uuid::Uuid;

pub fn object_type_by_id(id: Uuid) -> String {
    format!("objecttype:id:{}", id)
}

pub fn object_type_by_name(name: &str) -> String {
    format!("objecttype:name:{}", name)
}

pub fn object_type_list_pattern() -> String {
    "objecttypes:list:*".to_string()
}

pub fn object_type_search_pattern() -> String {
    "objecttypes:search:*".to_string()
}

pub fn object_type_list_key(filter_digest: &str) -> String {
    format!("objecttypes:list:{}", filter_digest)
}

pub fn object_type_search_key(query_digest: &str) -> String {
    format!("objecttypes:search:{}", query_digest)
}

pub fn link_type_by_id(id: Uuid) -> String {
    format!("linktype:id:{}", id)
}

pub fn link_type_by_name(name: &str) -> String {
    format!("linktype:name:{}", name)
}

pub fn link_type_list_pattern() -> String {
    "linktypes:list:*".to_string()
}

pub fn link_type_list_key(filter_digest: &str) -> String {
    format!("linktypes:list:{}", filter_digest)
}

/// Every pattern that must be invalidated when any ObjectType changes.
pub fn object_type_invalidation_patterns() -> [String; 2] {
    [object_type_list_pattern(), object_type_search_pattern()]
}

/// Every pattern that must be invalidated when any LinkType changes.
pub fn link_type_invalidation_patterns() -> [String; 1] {
    [link_type_list_pattern()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        let id = Uuid::new_v4();
        assert!(object_type_by_id(id).starts_with("objecttype:id:"));
        assert!(link_type_by_name("WorksAt").starts_with("linktype:name:"));
    }
}
