//! Generative media clients for populating slide decks.
//!
//! The core is [`JobPoller`]: submit a generation task, then poll its status
//! at a fixed interval until it completes, fails, or times out. [`KieClient`]
//! is the Kie.ai Veo transport it drives, and [`VideoGenerator`] wires the two
//! into text-to-video and image-to-video flows.

pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod job;
pub mod kie;
pub mod poller;
pub mod ui;

pub use error::PollError;
pub use generate::{VideoGenerator, VideoOptions};
pub use job::{Job, JobStatus};
pub use kie::{KieClient, KieError};
pub use poller::{JobPoller, PollSettings, TaskApi};
