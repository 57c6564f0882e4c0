//! Azure Resource Manager identifiers
//!
//! Parses the subscription and resource group out of an ARM-style ID such as
//! `/subscriptions/<sub>/resourceGroups/<rg>/providers/<ns>/<type>/<name>` and
//! predicts the ID a resource gets once its resource group has been moved.
//!
//! Not every `id` attribute is an ARM path. Storage blobs and shares use URLs like
//! `https://account.blob.core.windows.net/container/blob`; those parse to an
//! identifier without subscription or resource group.

/// The grouping parts of an ARM identifier. Either part is absent when the ID
/// does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AzureResourceId<'a> {
    pub subscription_id: Option<&'a str>,
    pub resource_group: Option<&'a str>,
}

/// Parse the subscription and resource group out of an identifier.
///
/// The subscription is only recognized when the ID starts with `/subscriptions/`.
/// The `resourceGroups` segment name is matched case-insensitively because Azure
/// returns both `resourceGroups` and `resourcegroups` depending on the API.
pub fn parse(id: &str) -> AzureResourceId<'_> {
    let mut segments = id.split('/');

    let subscription_id = match (segments.next(), segments.next(), segments.next()) {
        (Some(""), Some(s), Some(sub))
            if s.eq_ignore_ascii_case("subscriptions") && !sub.is_empty() =>
        {
            Some(sub)
        }
        _ => None,
    };

    let mut resource_group = None;
    let mut previous: Option<&str> = None;
    for segment in id.split('/') {
        if let Some(prev) = previous {
            if prev.eq_ignore_ascii_case("resourceGroups") && !segment.is_empty() {
                resource_group = Some(segment);
                break;
            }
        }
        previous = Some(segment);
    }

    AzureResourceId {
        subscription_id,
        resource_group,
    }
}

pub fn subscription_id(id: &str) -> Option<&str> {
    parse(id).subscription_id
}

pub fn resource_group(id: &str) -> Option<&str> {
    parse(id).resource_group
}

/// `/subscriptions/{subscription_id}/resourceGroups/{resource_group}`
pub fn resource_group_prefix(subscription_id: &str, resource_group: &str) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}",
        subscription_id, resource_group
    )
}

/// Replace `source_prefix` with `target_prefix` when `id` starts with it.
///
/// Only the leading occurrence is replaced. The `subscriptions` and
/// `resourceGroups` segment names match in any case, the same way [`parse`]
/// reads them. Any other ID, including URL-shaped ones and IDs in a resource
/// group outside the move, is returned unchanged.
pub fn rewrite(id: &str, source_prefix: &str, target_prefix: &str) -> String {
    match strip_group_prefix(id, source_prefix) {
        Some(rest) => format!("{}{}", target_prefix, rest),
        None => id.to_string(),
    }
}

fn strip_group_prefix<'a>(id: &'a str, prefix: &str) -> Option<&'a str> {
    if let Some(rest) = id.strip_prefix(prefix) {
        return Some(rest);
    }
    let head = id.get(..prefix.len())?;
    if head.split('/').count() != prefix.split('/').count() {
        return None;
    }
    let same_segments = head.split('/').zip(prefix.split('/')).all(|(a, b)| {
        a == b || (matches!(b, "subscriptions" | "resourceGroups") && a.eq_ignore_ascii_case(b))
    });
    if same_segments {
        Some(&id[prefix.len()..])
    } else {
        None
    }
}

/// IDs like `https://account.blob.core.windows.net/...` point at a location and
/// must never be handed to the move API.
pub fn is_url_shaped(id: &str) -> bool {
    match id.find("://") {
        Some(pos) => {
            pos > 0
                && id[..pos]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
