use serde::{Deserialize, Deserializer, Serialize};

/// Output of a completed job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobResults {
    #[serde(default, deserialize_with = "null_as_default")]
    pub transcript: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub viral_hooks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub captions: Vec<Caption>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clips: Vec<Clip>,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Caption {
    pub caption: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hashtags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character_count: usize,
}

/// Treats an explicit `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Caption {
    /// Caption text followed by its hashtags, ready to paste.
    pub fn full_text(&self) -> String {
        if self.hashtags.is_empty() {
            return self.caption.clone();
        }
        format!("{}\n\n{}", self.caption, self.hashtags.join(" "))
    }
}

/// A suggested clip, offsets in seconds from the start of the source video.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl Clip {
    pub fn duration(&self) -> f64 {
        self.duration
            .unwrap_or_else(|| (self.end_time - self.start_time).max(0.0))
    }
}
