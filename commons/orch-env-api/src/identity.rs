use kube::Resource;
use kube::core::GroupVersionKind;

/// Type-identity constants consumed by registration and dispatch.
///
/// Everything is derived from the resource's kind and its fixed
/// group/version pair, so both generations compute theirs the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeIdentity {
    pub kind: String,
    /// `Kind.group`, the Kubernetes `GroupKind` string form
    pub group_kind: String,
    /// `Kind.group/version`
    pub kind_api_version: String,
    pub list_kind: String,
    pub gvk: GroupVersionKind,
}

impl TypeIdentity {
    pub fn of<K: Resource<DynamicType = ()>>() -> Self {
        let kind = K::kind(&()).to_string();
        let group = K::group(&()).to_string();
        let version = K::version(&()).to_string();
        let group_kind = if group.is_empty() {
            kind.clone()
        } else {
            format!("{kind}.{group}")
        };
        TypeIdentity {
            kind_api_version: format!("{kind}.{}", K::api_version(&())),
            list_kind: format!("{kind}List"),
            gvk: GroupVersionKind::gvk(&group, &version, &kind),
            group_kind,
            kind,
        }
    }

    pub fn api_version(&self) -> String {
        api_version_of(&self.gvk)
    }
}

pub fn api_version_of(gvk: &GroupVersionKind) -> String {
    if gvk.group.is_empty() {
        gvk.version.clone()
    } else {
        format!("{}/{}", gvk.group, gvk.version)
    }
}

/// Split `group/version`; a bare `version` belongs to the core group.
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    match api_version.rsplit_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}
