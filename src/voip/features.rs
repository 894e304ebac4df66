//! Call feature negotiation.
//!
//! Peers advertise optional capabilities in a `features` object keyed by
//! feature name:
//!
//! ```json
//! {"video": null, "superextension": {"a": 1}}
//! ```
//!
//! Names this codec does not know are kept as [`CallFeature::Unknown`] with
//! their parameters untouched, so a receiver can re-encode them unchanged.

use super::error::{Result, VoipError};
use super::fields::type_name;
use log::trace;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Name of the video calling feature.
pub const VIDEO_FEATURE: &str = "video";

/// A single negotiable call feature.
#[derive(Debug, Clone, PartialEq)]
pub enum CallFeature {
    /// Presence-only feature. Encode-side helper: decoding never yields it.
    Simple { name: String },
    /// Video calling support.
    Video,
    /// A feature this codec does not interpret.
    ///
    /// `params` is `None` for a JSON `null` value and `Some` (possibly
    /// empty) for an object.
    Unknown {
        name: String,
        params: Option<Map<String, Value>>,
    },
}

impl CallFeature {
    pub fn simple(name: impl Into<String>) -> Self {
        Self::Simple { name: name.into() }
    }

    pub fn unknown(name: impl Into<String>, params: Option<Map<String, Value>>) -> Self {
        Self::Unknown {
            name: name.into(),
            params,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Simple { name } | Self::Unknown { name, .. } => name,
            Self::Video => VIDEO_FEATURE,
        }
    }

    pub fn params(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Unknown { params, .. } => params.as_ref(),
            Self::Simple { .. } | Self::Video => None,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video)
    }

    fn to_json(&self) -> Value {
        self.params()
            .map(|params| Value::Object(params.clone()))
            .unwrap_or(Value::Null)
    }
}

impl fmt::Display for CallFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params() {
            Some(params) => write!(f, "{}({})", self.name(), Value::Object(params.clone())),
            None => f.write_str(self.name()),
        }
    }
}

type FeatureDecoder = fn(&Value) -> CallFeature;

fn decode_video(_: &Value) -> CallFeature {
    CallFeature::Video
}

/// Well-known feature names and how to decode them. Anything not listed
/// here decodes to [`CallFeature::Unknown`].
const KNOWN_FEATURES: &[(&str, FeatureDecoder)] = &[(VIDEO_FEATURE, decode_video)];

fn decode_feature(name: &str, value: &Value) -> Result<CallFeature> {
    if let Some((_, decode)) = KNOWN_FEATURES.iter().find(|(known, _)| *known == name) {
        return Ok(decode(value));
    }
    trace!("Keeping unknown call feature '{}'", name);
    match value {
        Value::Null => Ok(CallFeature::unknown(name, None)),
        Value::Object(params) => Ok(CallFeature::unknown(name, Some(params.clone()))),
        other => Err(VoipError::BadMessage(format!(
            "feature '{name}' must have an object or null value, got {}",
            type_name(other)
        ))),
    }
}

/// Ordered list of call features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureList {
    features: Vec<CallFeature>,
}

impl FeatureList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a feature. Names are only checked by [`validate`](Self::validate)
    /// when the list is encoded.
    pub fn add_feature(&mut self, feature: CallFeature) -> &mut Self {
        self.features.push(feature);
        self
    }

    pub fn with_feature(mut self, feature: CallFeature) -> Self {
        self.features.push(feature);
        self
    }

    /// Exact, case-sensitive name match.
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&CallFeature> {
        self.features.iter().find(|f| f.name() == name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[CallFeature] {
        &self.features
    }

    pub fn iter(&self) -> impl Iterator<Item = &CallFeature> {
        self.features.iter()
    }

    /// Every name must be non-empty and appear once, or the JSON object
    /// would lose entries.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.features.len());
        for feature in &self.features {
            let name = feature.name();
            if name.is_empty() {
                return Err(VoipError::bad_message("feature name must not be empty"));
            }
            if !seen.insert(name) {
                return Err(VoipError::BadMessage(format!(
                    "duplicate feature name '{name}'"
                )));
            }
        }
        Ok(())
    }

    /// Encode as a JSON object keyed by feature name.
    pub fn to_json(&self) -> Result<Value> {
        self.validate()?;
        let map: Map<String, Value> = self
            .features
            .iter()
            .map(|f| (f.name().to_string(), f.to_json()))
            .collect();
        Ok(Value::Object(map))
    }

    /// Decode a feature object.
    ///
    /// Fails only if `value` is not an object or an unrecognised feature
    /// carries something other than an object or `null`.
    pub fn parse(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(VoipError::BadMessage(format!(
                "features must be a JSON object, got {}",
                type_name(value)
            )));
        };
        let features = map
            .iter()
            .map(|(name, value)| decode_feature(name, value))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { features })
    }
}

impl FromIterator<CallFeature> for FeatureList {
    fn from_iter<I: IntoIterator<Item = CallFeature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FeatureList {
    type Item = &'a CallFeature;
    type IntoIter = std::slice::Iter<'a, CallFeature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

impl fmt::Display for FeatureList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FeatureList[")?;
        for (i, feature) in self.features.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{feature}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_empty() {
        assert_eq!(FeatureList::new().to_json().unwrap().to_string(), "{}");
    }

    #[test]
    fn test_encode_mixed() {
        let mut params = Map::new();
        params.insert("a".into(), json!(1));
        let list = FeatureList::new()
            .with_feature(CallFeature::Video)
            .with_feature(CallFeature::simple("hullo"))
            .with_feature(CallFeature::unknown("argh", Some(params)));

        assert_eq!(
            list.to_json().unwrap(),
            json!({"video": null, "hullo": null, "argh": {"a": 1}})
        );
    }

    #[test]
    fn test_decode_empty() {
        let list = FeatureList::parse(&json!({})).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_decode_video() {
        let list = FeatureList::parse(&json!({"video": null})).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.features()[0], CallFeature::Video);
    }

    #[test]
    fn test_decode_video_ignores_value() {
        let list = FeatureList::parse(&json!({"video": {"resolution": 720}})).unwrap();
        assert_eq!(list.features(), &[CallFeature::Video]);
    }

    #[test]
    fn test_decode_unknown_null_params() {
        let list = FeatureList::parse(&json!({"asdf": null})).unwrap();
        assert_eq!(list.len(), 1);
        let feature = &list.features()[0];
        assert_eq!(feature.name(), "asdf");
        assert!(matches!(feature, CallFeature::Unknown { params: None, .. }));
    }

    #[test]
    fn test_decode_unknown_empty_params() {
        let list = FeatureList::parse(&json!({"asdf": {}})).unwrap();
        assert_eq!(list.len(), 1);
        let params = list.features()[0].params().unwrap();
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn test_decode_never_yields_simple() {
        let encoded = FeatureList::new()
            .with_feature(CallFeature::simple("hullo"))
            .to_json()
            .unwrap();
        let decoded = FeatureList::parse(&encoded).unwrap();
        assert_eq!(decoded.features(), &[CallFeature::unknown("hullo", None)]);
    }

    #[test]
    fn test_unknown_params_survive_reencoding() {
        let source = json!({"superextension": {"a": 1, "nested": {"b": [true, null]}}});
        let decoded = FeatureList::parse(&source).unwrap();
        assert_eq!(decoded.to_json().unwrap(), source);
    }

    #[test]
    fn test_decode_rejects_scalar_value_for_unknown() {
        let err = FeatureList::parse(&json!({"asdf": 3})).unwrap_err();
        assert!(err.to_string().contains("feature 'asdf'"));
        assert!(FeatureList::parse(&json!({"asdf": "x"})).is_err());
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(FeatureList::parse(&json!(["video"])).is_err());
        assert!(FeatureList::parse(&Value::Null).is_err());
    }

    #[test]
    fn test_has_feature_exact_match() {
        let list = FeatureList::new()
            .with_feature(CallFeature::Video)
            .with_feature(CallFeature::simple("hullo"))
            .with_feature(CallFeature::unknown("argh", None));

        assert!(list.has_feature("video"));
        assert!(list.has_feature("hullo"));
        assert!(list.has_feature("argh"));
        assert!(!list.has_feature("arg"));
        assert!(!list.has_feature(""));
        assert!(!list.has_feature("videoo"));
        assert!(!list.has_feature("Video"));
    }

    #[test]
    fn test_add_feature_allows_duplicates() {
        let mut list = FeatureList::new();
        list.add_feature(CallFeature::Video)
            .add_feature(CallFeature::Video);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_encode_rejects_duplicate_names() {
        let mut params = Map::new();
        params.insert("a".into(), json!(1));
        let list = FeatureList::new()
            .with_feature(CallFeature::Video)
            .with_feature(CallFeature::unknown("video", Some(params)));

        let err = list.to_json().unwrap_err();
        assert!(err.is_bad_message());
        assert!(err.to_string().contains("duplicate feature name 'video'"));

        let list = FeatureList::new()
            .with_feature(CallFeature::simple("hd"))
            .with_feature(CallFeature::unknown("hd", None));
        assert!(list.validate().is_err());
    }

    #[test]
    fn test_encode_rejects_empty_name() {
        let list = FeatureList::new().with_feature(CallFeature::simple(""));
        let err = list.to_json().unwrap_err();
        assert!(err.to_string().contains("feature name must not be empty"));
    }

    #[test]
    fn test_display() {
        let mut params = Map::new();
        params.insert("a".into(), json!(1));
        let list = FeatureList::new()
            .with_feature(CallFeature::Video)
            .with_feature(CallFeature::unknown("hullo", Some(params)))
            .with_feature(CallFeature::unknown("argh", None));

        assert_eq!(list.to_string(), r#"FeatureList[video, hullo({"a":1}), argh]"#);
        assert_eq!(FeatureList::new().to_string(), "FeatureList[]");
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let list = FeatureList::new()
            .with_feature(CallFeature::simple("b"))
            .with_feature(CallFeature::simple("a"))
            .with_feature(CallFeature::Video);
        let names: Vec<&str> = list.iter().map(CallFeature::name).collect();
        assert_eq!(names, ["b", "a", "video"]);
    }
}
