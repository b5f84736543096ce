pub mod lessons;
pub mod sentences;

pub use lessons::{Instructions, LessonContent, LessonLibrary, LevelInfo};
pub use sentences::SentencePool;

use crate::error::{KetikError, Result};
use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/content/data");

fn read_embedded<T: DeserializeOwned>(file_name: &str) -> Result<T> {
    let file = DATA_DIR
        .get_file(file_name)
        .ok_or_else(|| KetikError::Content(format!("{file_name} is not embedded")))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| KetikError::Content(format!("{file_name} is not utf-8")))?;

    Ok(serde_json::from_str(contents)?)
}
