//! Configuração do deckmedia carregada a partir de `deckmedia.toml`.
//!
//! A struct [`DeckMediaConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A chave da API é resolvida explicitamente, na ordem: flag `--api-key`,
//! variável de ambiente `KIE_API_KEY`, campo `api_key` do arquivo.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::kie::client::{API_URL, UPLOAD_URL};
use crate::kie::{AspectRatio, VeoModel};
use crate::poller::PollSettings;

/// Nome do arquivo de configuração procurado no diretório atual.
pub const CONFIG_FILE: &str = "deckmedia.toml";

/// Variável de ambiente com a chave da Kie.ai.
pub const API_KEY_ENV: &str = "KIE_API_KEY";

/// Configuração de nível superior carregada de `deckmedia.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeckMediaConfig {
    /// Chave da API Kie.ai.
    #[serde(default)]
    pub api_key: String,

    /// URL base da API Veo.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Endpoint de upload de imagens em base64.
    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    /// Tempo máximo de espera por um job, em segundos.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Intervalo fixo entre consultas de status, em segundos.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Modelo usado quando não especificado via CLI.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Proporção usada quando não especificada via CLI.
    #[serde(default = "default_aspect_ratio")]
    pub default_aspect_ratio: String,
}

fn default_base_url() -> String {
    API_URL.to_string()
}

fn default_upload_url() -> String {
    UPLOAD_URL.to_string()
}

// Dez minutos, o suficiente para o modelo de qualidade.
fn default_timeout_secs() -> u64 {
    600
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_model() -> String {
    "veo3".to_string()
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

impl Default for DeckMediaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            upload_url: default_upload_url(),
            timeout_secs: default_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            default_model: default_model(),
            default_aspect_ratio: default_aspect_ratio(),
        }
    }
}

impl DeckMediaConfig {
    /// Carrega `deckmedia.toml` do diretório atual, ou o caminho explícito.
    ///
    /// Sem caminho explícito, a ausência do arquivo resulta nos valores
    /// padrão; com caminho explícito, a ausência é um erro.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    Self::load_from(path)?
                } else {
                    Self::default()
                }
            }
        };

        // Variável de ambiente tem precedência sobre o arquivo para a chave API.
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }

    /// Lê e interpreta um arquivo TOML específico.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str::<DeckMediaConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config
            .poll_settings()
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Resolve a chave final: a flag da CLI vence o valor já carregado.
    pub fn resolve_api_key(&self, cli_key: Option<&str>) -> Result<String> {
        match resolve_key(cli_key, Some(self.api_key.as_str())) {
            Some(key) => Ok(key.to_string()),
            None => bail!(
                "No Kie.ai API key found. Pass --api-key, set {API_KEY_ENV}, or add api_key to {CONFIG_FILE}."
            ),
        }
    }

    /// Tempos de espera do arquivo; intervalo zero é rejeitado.
    pub fn poll_settings(&self) -> Result<PollSettings> {
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be at least 1");
        }
        Ok(PollSettings::from_secs(self.timeout_secs, self.poll_interval_secs))
    }

    pub fn model(&self) -> Result<VeoModel> {
        VeoModel::parse(&self.default_model)
            .with_context(|| format!("unknown default_model {:?}", self.default_model))
    }

    pub fn aspect_ratio(&self) -> Result<AspectRatio> {
        AspectRatio::parse(&self.default_aspect_ratio).with_context(|| {
            format!("unknown default_aspect_ratio {:?}", self.default_aspect_ratio)
        })
    }
}

// Primeira chave não vazia, na ordem de prioridade recebida.
fn resolve_key<'a>(first: Option<&'a str>, second: Option<&'a str>) -> Option<&'a str> {
    [first, second]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|k| !k.is_empty())
}
