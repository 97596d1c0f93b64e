//! Tipos de dados para requisições e respostas da API Veo da Kie.ai.
//!
//! As requisições derivam `Serialize` no formato camelCase esperado pela API.
//! As respostas são lidas de forma tolerante: a API às vezes embrulha o
//! conteúdo em `data` e às vezes não, e `resultJson` pode vir como string
//! JSON ou como objeto.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::KieError;
use crate::job::{Job, JobStatus};

/// Modelo Veo usado na geração.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VeoModel {
    /// Maior qualidade.
    #[serde(rename = "veo3")]
    Veo3,
    /// Mais rápido.
    #[serde(rename = "veo3_fast")]
    Veo3Fast,
}

impl VeoModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VeoModel::Veo3 => "veo3",
            VeoModel::Veo3Fast => "veo3_fast",
        }
    }

    /// Interpreta o nome usado em `deckmedia.toml`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "veo3" => Some(VeoModel::Veo3),
            "veo3_fast" => Some(VeoModel::Veo3Fast),
            _ => None,
        }
    }
}

impl fmt::Display for VeoModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proporção do vídeo gerado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
        }
    }

    pub fn parse(ratio: &str) -> Option<Self> {
        match ratio.trim() {
            "16:9" => Some(AspectRatio::Landscape),
            "9:16" => Some(AspectRatio::Portrait),
            "1:1" => Some(AspectRatio::Square),
            _ => None,
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de geração: só texto ou texto com imagem de referência.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationType {
    #[serde(rename = "TEXT_2_VIDEO")]
    TextToVideo,
    #[serde(rename = "REFERENCE_2_VIDEO")]
    ReferenceToVideo,
}

/// Corpo da requisição para `POST /veo/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    /// Descrição textual do vídeo.
    pub prompt: String,
    /// URLs públicas das imagens de referência (apenas image-to-video).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    pub model: VeoModel,
    pub aspect_ratio: AspectRatio,
    /// A API traduz prompts que não estejam em inglês quando ativo.
    pub enable_translation: bool,
    pub generation_type: GenerationType,
}

impl VideoRequest {
    /// Requisição text-to-video.
    pub fn text(prompt: impl Into<String>, model: VeoModel, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: prompt.into(),
            image_urls: None,
            model,
            aspect_ratio,
            enable_translation: true,
            generation_type: GenerationType::TextToVideo,
        }
    }

    /// Requisição image-to-video a partir de uma imagem já enviada.
    pub fn reference(
        prompt: impl Into<String>,
        image_url: String,
        model: VeoModel,
        aspect_ratio: AspectRatio,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            image_urls: Some(vec![image_url]),
            model,
            aspect_ratio,
            enable_translation: true,
            generation_type: GenerationType::ReferenceToVideo,
        }
    }
}

/// Corpo da requisição de upload em base64.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Data URI completo: `data:<mime>;base64,<conteúdo>`.
    pub base64_data: String,
    pub upload_path: String,
    pub file_name: String,
}

/// Tipo MIME deduzido pela extensão do arquivo; `image/jpeg` por padrão.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

// Conteúdo útil da resposta: `data` quando presente, senão o corpo inteiro.
fn payload(body: &Value) -> &Value {
    match body.get("data") {
        Some(data) if data.is_object() => data,
        _ => body,
    }
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Extrai o `taskId` da resposta de criação (`data.taskId` ou `taskId`).
pub fn extract_task_id(body: &Value) -> Option<String> {
    body.get("data")
        .and_then(|data| non_empty_str(data, "taskId"))
        .or_else(|| non_empty_str(body, "taskId"))
        .map(str::to_string)
}

/// Extrai `data.downloadUrl` da resposta de upload.
pub fn extract_download_url(body: &Value) -> Option<String> {
    body.get("data")
        .and_then(|data| non_empty_str(data, "downloadUrl"))
        .map(str::to_string)
}

/// Envelope de erro com HTTP 200: `code` diferente de 200 e sem `data`.
///
/// Ex.: `{"code":404,"msg":"task not found","data":null}`.
pub fn envelope_error(body: &Value) -> Option<KieError> {
    let code = body.get("code").and_then(Value::as_u64)?;
    let has_data = body.get("data").is_some_and(|d| !d.is_null());
    if code == 200 || has_data {
        return None;
    }
    let message = non_empty_str(body, "msg")
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());
    Some(KieError::ApiError {
        status: u16::try_from(code).unwrap_or(u16::MAX),
        message,
    })
}

/// Converte a resposta de `GET /veo/record-info` em um [`Job`].
pub fn parse_record_info(task_id: &str, body: &Value) -> Job {
    let data = payload(body);

    let raw_state = non_empty_str(data, "state")
        .or_else(|| non_empty_str(data, "status"))
        .unwrap_or("unknown");
    let status = JobStatus::normalize(raw_state);

    let result_urls = data
        .get("resultJson")
        .map(result_urls_from)
        .unwrap_or_default();

    let error = non_empty_str(data, "failMsg")
        .or_else(|| non_empty_str(data, "error"))
        .map(str::to_string);

    Job::new(task_id.to_string(), status, result_urls, error)
}

// `resultJson` pode ser uma string JSON ou um objeto; conteúdo inválido vira lista vazia.
fn result_urls_from(result_json: &Value) -> Vec<String> {
    let parsed = match result_json {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(v) => v,
            Err(_) => return Vec::new(),
        },
        other => other.clone(),
    };

    parsed
        .get("resultUrls")
        .and_then(Value::as_array)
        .map(|urls| {
            urls.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
