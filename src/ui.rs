//! Interface de terminal do deckmedia: spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`PollProgress`] acompanha visualmente a
//! espera por um job de geração de vídeo.

use std::time::{Duration, Instant};

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::PollError;
use crate::job::{Job, JobStatus};

/// Indicador visual de progresso enquanto um job remoto é consultado.
///
/// Exibe um spinner animado durante a espera e mensagens coloridas para
/// sucesso (verde), falha (vermelho) e estados intermediários (amarelo).
pub struct PollProgress {
    pb: ProgressBar,
    started: Instant,
    green: Style,
    red: Style,
    yellow: Style,
}

impl PollProgress {
    /// Inicia o spinner com uma mensagem inicial.
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            started: Instant::now(),
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Atualiza o spinner com o status mais recente e o tempo decorrido.
    pub fn update(&self, job: &Job, attempt: u32) {
        let elapsed = self.started.elapsed().as_secs();
        self.pb.set_message(format!(
            "{} {} (check #{attempt}, {elapsed}s)",
            job.task_id,
            self.yellow.apply_to(&job.status)
        ));
    }

    /// Finaliza o spinner e exibe o resultado de sucesso.
    pub fn complete(&self, job: &Job) {
        self.pb.finish_and_clear();
        match job.status {
            JobStatus::Completed => {
                println!("  {} Task {} completed", self.green.apply_to("✓"), job.task_id);
                for url in &job.result_urls {
                    println!("    {url}");
                }
            }
            _ => {
                println!(
                    "  {} Task {} submitted ({})",
                    self.yellow.apply_to("…"),
                    job.task_id,
                    job.status
                );
            }
        }
    }

    /// Finaliza o spinner e exibe a falha em vermelho.
    pub fn fail(&self, err: &PollError) {
        self.pb.finish_and_clear();
        println!("  {} {err}", self.red.apply_to("✗"));
    }

    /// Imprime uma linha suspendendo o spinner, se ainda ativo.
    pub fn note(&self, message: &str) {
        self.pb.suspend(|| println!("  {message}"));
    }
}

/// Imprime o job formatado em JSON.
pub fn print_job_json(job: &Job) {
    println!("{}", serde_json::to_string_pretty(job).unwrap_or_default());
}

/// Resumo legível de um job, uma linha por campo.
pub fn print_job_summary(job: &Job) {
    let status_style = match job.status {
        JobStatus::Completed => Style::new().green().bold(),
        JobStatus::Failed => Style::new().red().bold(),
        _ => Style::new().yellow(),
    };
    println!("task:    {}", job.task_id);
    println!("status:  {}", status_style.apply_to(&job.status));
    if let Some(error) = &job.error {
        println!("error:   {error}");
    }
    for url in &job.result_urls {
        println!("result:  {url}");
    }
    println!("checked: {}", job.checked_at.to_rfc3339());
}
