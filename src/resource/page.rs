use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One page of a collection read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub is_last_page: bool,
}

impl<T> Page<T> {
    /// A page is last when it holds fewer items than were asked for,
    /// including zero. A full page never ends the read, even if the
    /// collection happens to end there.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        let is_last_page = items.len() < page_size;
        Self {
            items,
            is_last_page,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Collection endpoints answer with a bare array; some wrap it in
/// `{"results": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageBody<T> {
    Bare(Vec<T>),
    Envelope { results: Vec<T> },
}

pub(crate) fn decode_items<T: DeserializeOwned>(body: &[u8]) -> serde_json::Result<Vec<T>> {
    let body: PageBody<T> = serde_json::from_slice(body)?;
    Ok(match body {
        PageBody::Bare(items) | PageBody::Envelope { results: items } => items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_empty_pages_are_last() {
        assert!(Page::new(vec![1; 50], 100).is_last_page);
        assert!(Page::<u8>::new(Vec::new(), 100).is_last_page);
        assert!(!Page::new(vec![1; 100], 100).is_last_page);
    }

    #[test]
    fn decodes_bare_and_enveloped_arrays() {
        let bare: Vec<u32> = decode_items(b"[1,2,3]").unwrap();
        let wrapped: Vec<u32> =
            decode_items(br#"{"pagination":{"offset":0},"results":[4,5]}"#).unwrap();
        assert_eq!(bare, vec![1, 2, 3]);
        assert_eq!(wrapped, vec![4, 5]);
    }

    #[test]
    fn rejects_non_collection_body() {
        assert!(decode_items::<u32>(br#"{"id":1}"#).is_err());
    }
}
