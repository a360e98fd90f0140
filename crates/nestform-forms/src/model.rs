//! Record access boundary.
//!
//! Forms read the records they wrap through the [`Model`] trait, once, at
//! construction time. Nothing in this crate writes back to a record.

use crate::value::FieldValue;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Named attribute access to an underlying domain record.
pub trait Model: fmt::Debug + Send + Sync {
	/// Reads a scalar attribute. `None` means the record has no such
	/// attribute, which forms treat as null.
	fn attribute(&self, name: &str) -> Option<FieldValue>;

	/// Reads a single associated record.
	fn association(&self, _name: &str) -> Option<Arc<dyn Model>> {
		None
	}

	/// Reads an ordered collection of associated records.
	fn association_many(&self, _name: &str) -> Vec<Arc<dyn Model>> {
		Vec::new()
	}
}

/// A dynamic record holding arbitrary attributes and associations.
///
/// # Examples
///
/// ```
/// use nestform_forms::{FieldValue, Model, Record};
/// use std::sync::Arc;
///
/// let artist = Arc::new(Record::new().with_attribute("name", "Propagandhi"));
/// let album = Record::new()
///     .with_attribute("title", "How to Clean Everything")
///     .with_association("artist", artist);
///
/// assert_eq!(album.attribute("title"), Some(FieldValue::from("How to Clean Everything")));
/// assert!(album.association("artist").is_some());
/// assert!(album.association_many("songs").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record {
	attributes: IndexMap<String, FieldValue>,
	associations: IndexMap<String, Arc<dyn Model>>,
	collections: IndexMap<String, Vec<Arc<dyn Model>>>,
}

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	pub fn with_association<M: Model + 'static>(
		mut self,
		name: impl Into<String>,
		model: Arc<M>,
	) -> Self {
		self.associations.insert(name.into(), model);
		self
	}

	pub fn with_collection<M, I>(mut self, name: impl Into<String>, models: I) -> Self
	where
		M: Model + 'static,
		I: IntoIterator<Item = Arc<M>>,
	{
		let models = models
			.into_iter()
			.map(|model| model as Arc<dyn Model>)
			.collect();
		self.collections.insert(name.into(), models);
		self
	}
}

impl Model for Record {
	fn attribute(&self, name: &str) -> Option<FieldValue> {
		self.attributes.get(name).cloned()
	}

	fn association(&self, name: &str) -> Option<Arc<dyn Model>> {
		self.associations.get(name).cloned()
	}

	fn association_many(&self, name: &str) -> Vec<Arc<dyn Model>> {
		self.collections.get(name).cloned().unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_missing_attribute_reads_as_none() {
		let record = Record::new();

		assert_eq!(record.attribute("name"), None);
		assert!(record.association("label").is_none());
	}

	#[rstest]
	fn test_collection_preserves_order_and_identity() {
		// Arrange
		let first = Arc::new(Record::new().with_attribute("title", "Damnit"));
		let second = Arc::new(Record::new().with_attribute("title", "Dammit"));
		let album = Record::new().with_collection("songs", [first.clone(), second.clone()]);

		// Act
		let songs = album.association_many("songs");

		// Assert
		assert_eq!(songs.len(), 2);
		assert!(std::ptr::addr_eq(Arc::as_ptr(&songs[0]), Arc::as_ptr(&first)));
		assert!(std::ptr::addr_eq(Arc::as_ptr(&songs[1]), Arc::as_ptr(&second)));
	}
}
