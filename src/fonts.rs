//! Font loading with a per-weight cache.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use parking_lot::Mutex;
use rusttype::Font;
use thiserror::Error;

use crate::layout::FontWeight;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font {name}: {source}")]
    Read {
        name: &'static str,
        source: std::io::Error,
    },
    #[error("failed to parse font {0}")]
    Parse(&'static str),
}

fn file_for(weight: FontWeight) -> &'static str {
    match weight {
        FontWeight::Regular => "Roboto-Regular.ttf",
        FontWeight::Medium => "Roboto-Medium.ttf",
        FontWeight::Bold => "Roboto-Bold.ttf",
    }
}

pub struct FontStore {
    dir: PathBuf,
    cache: Mutex<HashMap<FontWeight, Arc<Font<'static>>>>,
}

impl FontStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, weight: FontWeight) -> Result<Arc<Font<'static>>, FontError> {
        if let Some(font) = self.cache.lock().get(&weight) {
            return Ok(Arc::clone(font));
        }

        let name = file_for(weight);
        let bytes = std::fs::read(self.dir.join(name))
            .map_err(|source| FontError::Read { name, source })?;
        let font = Font::try_from_vec(bytes).ok_or(FontError::Parse(name))?;

        let font = Arc::new(font);
        self.cache.lock().insert(weight, Arc::clone(&font));
        Ok(font)
    }
}
