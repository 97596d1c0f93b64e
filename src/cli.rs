//! Interface de linha de comando do deckmedia baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (video, status, wait)
//! e flags globais (--config, --api-key, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::kie::{AspectRatio, VeoModel};

/// deckmedia: geração de vídeo para slides via Kie.ai Veo.
#[derive(Debug, Parser)]
#[command(name = "deckmedia", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho para o arquivo de configuração (padrão: ./deckmedia.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Chave da API Kie.ai; tem precedência sobre KIE_API_KEY e o arquivo.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Modelo aceito pela CLI, mapeado para [`VeoModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelArg {
    /// Qualidade máxima.
    Veo3,
    /// Geração mais rápida.
    Veo3Fast,
}

impl From<ModelArg> for VeoModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Veo3 => VeoModel::Veo3,
            ModelArg::Veo3Fast => VeoModel::Veo3Fast,
        }
    }
}

/// Proporção aceita pela CLI, mapeada para [`AspectRatio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AspectArg {
    #[value(name = "16:9")]
    Landscape,
    #[value(name = "9:16")]
    Portrait,
    #[value(name = "1:1")]
    Square,
}

impl From<AspectArg> for AspectRatio {
    fn from(arg: AspectArg) -> Self {
        match arg {
            AspectArg::Landscape => AspectRatio::Landscape,
            AspectArg::Portrait => AspectRatio::Portrait,
            AspectArg::Square => AspectRatio::Square,
        }
    }
}

/// Sobrescritas de tempo de espera compartilhadas por `video` e `wait`.
#[derive(Debug, Clone, clap::Args)]
pub struct PollArgs {
    /// Tempo máximo de espera, em segundos.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Intervalo entre consultas de status, em segundos (mínimo 1).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gera um vídeo a partir de um prompt (e opcionalmente de uma imagem).
    Video {
        /// Descrição do vídeo.
        prompt: String,

        /// Imagem de referência para image-to-video.
        #[arg(long)]
        image: Option<PathBuf>,

        #[arg(long, value_enum)]
        model: Option<ModelArg>,

        #[arg(long, value_enum)]
        aspect_ratio: Option<AspectArg>,

        /// Onde salvar o vídeo gerado.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Retorna logo após a submissão, sem esperar o resultado.
        #[arg(long, default_value_t = false)]
        no_wait: bool,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Consulta o status atual de uma tarefa.
    Status {
        task_id: String,

        /// Imprime o job em JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Espera uma tarefa já submetida terminar.
    Wait {
        task_id: String,

        /// Onde salvar o vídeo gerado.
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        poll: PollArgs,
    },
}
