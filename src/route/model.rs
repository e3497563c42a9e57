use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A path with a single `:id` segment.
///
/// The id is kept as text so that a malformed id can be reported the same
/// way as an unknown one.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: String,
}

impl IdInput {
	pub fn uuid(&self) -> Option<Uuid> {
		Uuid::parse_str(&self.id).ok()
	}
}

/// A plain confirmation message.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Notice {
	pub msg: String,
}

impl Notice {
	pub fn new(msg: impl Into<String>) -> Self {
		Self { msg: msg.into() }
	}
}

/// Removes and returns the first entry matching `predicate`, leaving the
/// list untouched when nothing matches.
pub fn remove_entry<T>(entries: &mut Vec<T>, predicate: impl Fn(&T) -> bool) -> Option<T> {
	let index = entries.iter().position(predicate)?;

	Some(entries.remove(index))
}

/// Deserializes an optional date, treating `null` and blank text as absent.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<String>::deserialize(deserializer)? {
		Some(text) if !text.trim().is_empty() => {
			text.trim().parse().map(Some).map_err(de::Error::custom)
		}
		_ => Ok(None),
	}
}

/// Treats blank optional text as absent.
pub fn present(value: Option<String>) -> Option<String> {
	value
		.map(|value| value.trim().to_owned())
		.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_id_input() {
		let id = Uuid::new_v4();

		assert_eq!(IdInput { id: id.to_string() }.uuid(), Some(id));
		assert_eq!(IdInput { id: "5d1f".into() }.uuid(), None);
	}

	#[test]
	fn test_remove_entry() {
		let mut entries = vec![1, 2, 3, 2];

		assert_eq!(remove_entry(&mut entries, |e| *e == 2), Some(2));
		assert_eq!(entries, [1, 3, 2]);

		assert_eq!(remove_entry(&mut entries, |e| *e == 7), None);
		assert_eq!(entries, [1, 3, 2]);
	}

	#[test]
	fn test_optional_date() {
		#[derive(Deserialize)]
		struct Dates {
			#[serde(default, deserialize_with = "optional_date")]
			from: Option<NaiveDate>,
		}

		let parse =
			|value: serde_json::Value| serde_json::from_value::<Dates>(value).map(|d| d.from);

		assert_eq!(
			parse(serde_json::json!({ "from": "2020-01-31" })).unwrap(),
			NaiveDate::from_ymd_opt(2020, 1, 31)
		);
		assert_eq!(parse(serde_json::json!({ "from": "  " })).unwrap(), None);
		assert_eq!(parse(serde_json::json!({ "from": null })).unwrap(), None);
		assert_eq!(parse(serde_json::json!({})).unwrap(), None);
		assert!(parse(serde_json::json!({ "from": "31/01/2020" })).is_err());
	}

	#[test]
	fn test_present() {
		assert_eq!(present(Some("  acme ".into())), Some("acme".into()));
		assert_eq!(present(Some("   ".into())), None);
		assert_eq!(present(None), None);
	}
}
