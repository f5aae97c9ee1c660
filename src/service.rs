//! Single-card generation: load template, plan, render.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::assets::{AssetError, AssetLoader};
use crate::config::EngineConfig;
use crate::fonts::FontStore;
use crate::layout::{catalog, planner, LayoutError};
use crate::model::{Orientation, SchoolInfo, Side, StudentRecord};
use crate::render::{self, RenderError};

#[derive(Debug, Error)]
pub enum CardError {
    #[error("asset: {0}")]
    Asset(#[from] AssetError),
    #[error("layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("render: {0}")]
    Render(#[from] RenderError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

pub struct CardService {
    config: EngineConfig,
    assets: AssetLoader,
    fonts: FontStore,
}

impl CardService {
    /// Build a service over the configured directories. An inconsistent
    /// layout catalog is rejected here, before any request runs.
    pub fn new(config: EngineConfig, http: reqwest::Client) -> Result<Self, CardError> {
        catalog::validate_catalog()?;
        let assets = AssetLoader::new(http, &config.template_dir);
        let fonts = FontStore::new(&config.fonts_dir);
        Ok(Self {
            config,
            assets,
            fonts,
        })
    }

    pub fn assets(&self) -> &AssetLoader {
        &self.assets
    }

    /// Render one side of one student's card to an in-memory PNG.
    ///
    /// Only a missing template is fatal; photo, logo and font problems
    /// degrade to an absent element on the card.
    pub async fn generate_card(
        &self,
        student: &StudentRecord,
        school: &SchoolInfo,
        orientation: Orientation,
        side: Side,
    ) -> Result<Vec<u8>, CardError> {
        let template = self.assets.load_template(orientation, side)?;
        let layers = planner::plan(student, school, orientation, side)?;
        let png = render::render(&self.assets, &self.fonts, &template, &layers).await?;
        info!(
            student = %student.id,
            %orientation,
            %side,
            bytes = png.len(),
            "card rendered"
        );
        Ok(png)
    }

    /// Render one side and write it into the output directory under a fresh
    /// unique name, so concurrent calls and the cleanup sweep never collide.
    pub async fn generate_card_file(
        &self,
        student: &StudentRecord,
        school: &SchoolInfo,
        orientation: Orientation,
        side: Side,
    ) -> Result<PathBuf, CardError> {
        let png = self.generate_card(student, school, orientation, side).await?;
        std::fs::create_dir_all(&self.config.output_dir)?;
        let name = format!("card-{orientation}-{side}-{}.png", uuid::Uuid::new_v4());
        let path = self.config.output_dir.join(name);
        std::fs::write(&path, &png)?;
        Ok(path)
    }
}
