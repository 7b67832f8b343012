//! Localized message bundles for user-facing validation errors.

use crate::error::{HrPointError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "pt-BR")]
    PtBr,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::PtBr => "pt-BR",
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::En => &EN,
            Locale::PtBr => &PT_BR,
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = HrPointError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" => Ok(Locale::En),
            "pt" | "pt-br" => Ok(Locale::PtBr),
            _ => Err(HrPointError::ConfigInvalid {
                key: "locale".to_string(),
                reason: format!("Unsupported locale: {}. Use en or pt-BR", s),
            }),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Phrases used to compose validation messages
#[derive(Debug)]
pub struct Strings {
    pub wrong_data_format: &'static str,
    pub record: &'static str,
    pub batch_size: &'static str,
    pub title: &'static str,
    pub longitude: &'static str,
    pub latitude: &'static str,
    pub radius: &'static str,
    pub risk: &'static str,
    pub delta: &'static str,
    pub gravity_point: &'static str,
    pub location_point: &'static str,
    pub must_be_between: &'static str,
    pub and: &'static str,
    pub is_invalid: &'static str,
}

static EN: Strings = Strings {
    wrong_data_format: "Wrong data format",
    record: "record",
    batch_size: "batch size",
    title: "title",
    longitude: "longitude",
    latitude: "latitude",
    radius: "radius",
    risk: "risk",
    delta: "delta",
    gravity_point: "gravity point",
    location_point: "location point",
    must_be_between: "must be between",
    and: "and",
    is_invalid: "is invalid",
};

static PT_BR: Strings = Strings {
    wrong_data_format: "Formato de dados incorreto",
    record: "registro",
    batch_size: "tamanho do lote",
    title: "título",
    longitude: "longitude",
    latitude: "latitude",
    radius: "raio",
    risk: "risco",
    delta: "delta",
    gravity_point: "ponto de gravidade",
    location_point: "ponto de localização",
    must_be_between: "deve estar entre",
    and: "e",
    is_invalid: "é inválido",
};
