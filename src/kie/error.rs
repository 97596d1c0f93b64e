//! Tipos de erro para o cliente da API Kie.ai.
//!
//! Define [`KieError`] com variantes para erros HTTP, falhas de rede,
//! respostas incompletas e erros de arquivo local. Usa `thiserror` para
//! derivar `Display` e `Error` a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao interagir com a API da Kie.ai.
#[derive(Debug, Error)]
pub enum KieError {
    /// Erro retornado pela API (ex.: 401 chave inválida, 500 erro interno).
    /// Contém o código de status HTTP e o corpo da resposta.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A resposta de criação não trouxe `taskId`.
    #[error("no task ID in response: {body}")]
    MissingTaskId { body: String },

    /// A resposta de upload não trouxe `downloadUrl`.
    #[error("no download URL in upload response: {body}")]
    MissingDownloadUrl { body: String },

    /// Corpo da resposta não é JSON válido ou tem formato inesperado.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Requisição rejeitada localmente antes de qualquer chamada de rede.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
