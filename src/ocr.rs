use crate::errors::AppError;
use crate::AppResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

/// One OCR-detected text block. In an OCR result the first annotation carries
/// the full image text and every following one is a single fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnnotation {
    pub text: String,
    pub vertices: Vec<Vertex>,
}

impl TextAnnotation {
    pub fn new<S: Into<String>>(text: S, vertices: Vec<Vertex>) -> Self {
        Self {
            text: text.into(),
            vertices,
        }
    }
}

impl From<&str> for TextAnnotation {
    fn from(text: &str) -> Self {
        TextAnnotation::new(text, Vec::new())
    }
}

#[derive(Deserialize, Debug)]
struct RawAnnotation {
    #[serde(alias = "description")]
    text: String,
    #[serde(default)]
    vertices: Vec<Vertex>,
    #[serde(default, rename = "boundingPoly")]
    bounding_poly: Option<RawBoundingPoly>,
}

#[derive(Deserialize, Debug)]
struct RawBoundingPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

#[derive(Deserialize, Debug)]
struct RawVisionResponse {
    #[serde(default, rename = "textAnnotations")]
    text_annotations: Vec<RawAnnotation>,
}

#[derive(Deserialize, Debug)]
struct RawVisionDocument {
    #[serde(rename = "textAnnotations")]
    text_annotations: Vec<RawAnnotation>,
}

// Bare annotation arrays as well as Cloud Vision `images:annotate` bodies.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawOcrDocument {
    Annotations(Vec<RawAnnotation>),
    VisionBatch { responses: Vec<RawVisionResponse> },
    Vision(RawVisionDocument),
}

impl From<RawAnnotation> for TextAnnotation {
    fn from(raw: RawAnnotation) -> Self {
        let vertices = match raw.bounding_poly {
            Some(poly) if raw.vertices.is_empty() => poly.vertices,
            _ => raw.vertices,
        };
        TextAnnotation {
            text: raw.text,
            vertices,
        }
    }
}

pub fn parse_annotations(json: &str) -> AppResult<Vec<TextAnnotation>> {
    let raw_annotations = match serde_json::from_str::<RawOcrDocument>(json)? {
        RawOcrDocument::Annotations(annotations) => annotations,
        RawOcrDocument::VisionBatch { responses } => responses
            .into_iter()
            .next()
            .map(|response| response.text_annotations)
            .unwrap_or_default(),
        RawOcrDocument::Vision(response) => response.text_annotations,
    };
    Ok(raw_annotations.into_iter().map(TextAnnotation::from).collect())
}

pub async fn load_annotations<P: AsRef<Path>>(path: P) -> AppResult<Vec<TextAnnotation>> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path).await?;
    parse_annotations(&json).map_err(|err| AppError::SystemError {
        message: format!(
            "Failed to read OCR annotations from {}: {}",
            path.display(),
            err
        ),
    })
}
