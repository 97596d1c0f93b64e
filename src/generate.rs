use std::path::Path;

use tracing::info;

use crate::error::PollError;
use crate::job::Job;
use crate::kie::{AspectRatio, KieClient, KieError, VeoModel, VideoRequest};
use crate::poller::{JobPoller, PollSettings};

/// Per-call options for a video generation.
#[derive(Debug, Clone, Copy)]
pub struct VideoOptions {
    pub model: VeoModel,
    pub aspect_ratio: AspectRatio,
    /// Block until the task is terminal; otherwise return right after submission.
    pub wait: bool,
    pub poll: PollSettings,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            model: VeoModel::Veo3,
            aspect_ratio: AspectRatio::Landscape,
            wait: true,
            poll: PollSettings::default(),
        }
    }
}

/// Text-to-video and image-to-video flows on top of [`JobPoller`].
pub struct VideoGenerator {
    poller: JobPoller<KieClient>,
}

impl VideoGenerator {
    pub fn new(client: KieClient) -> Self {
        Self {
            poller: JobPoller::new(client),
        }
    }

    pub fn poller(&self) -> &JobPoller<KieClient> {
        &self.poller
    }

    pub fn client(&self) -> &KieClient {
        self.poller.api()
    }

    /// Generate a video from a text prompt.
    pub async fn text_to_video<F>(
        &self,
        prompt: &str,
        options: VideoOptions,
        on_status: F,
    ) -> Result<Job, PollError>
    where
        F: FnMut(&Job, u32),
    {
        validate_prompt(prompt)?;
        let request = VideoRequest::text(prompt, options.model, options.aspect_ratio);
        self.run(&request, options, on_status).await
    }

    /// Generate a video from a prompt and a local reference image.
    ///
    /// The image is uploaded first; an upload failure counts as a rejected
    /// submission.
    pub async fn image_to_video<F>(
        &self,
        prompt: &str,
        image_path: &Path,
        options: VideoOptions,
        on_status: F,
    ) -> Result<Job, PollError>
    where
        F: FnMut(&Job, u32),
    {
        validate_prompt(prompt)?;
        let image_url = self
            .client()
            .upload_image(image_path)
            .await
            .map_err(PollError::Submission)?;
        info!(%image_url, "reference image uploaded");

        let request =
            VideoRequest::reference(prompt, image_url, options.model, options.aspect_ratio);
        self.run(&request, options, on_status).await
    }

    async fn run<F>(
        &self,
        request: &VideoRequest,
        options: VideoOptions,
        on_status: F,
    ) -> Result<Job, PollError>
    where
        F: FnMut(&Job, u32),
    {
        let task_id = self.poller.submit(request).await?;
        if !options.wait {
            return Ok(Job::submitted(task_id));
        }
        self.poller
            .wait_until_done_with(
                &task_id,
                options.poll.timeout,
                options.poll.poll_interval,
                on_status,
            )
            .await
    }
}

fn validate_prompt(prompt: &str) -> Result<(), PollError> {
    if prompt.trim().is_empty() {
        return Err(PollError::Submission(KieError::InvalidRequest(
            "prompt must not be empty".into(),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobStatus;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator_for(server: &MockServer) -> VideoGenerator {
        let client = KieClient::with_urls(
            "test-key".into(),
            format!("{}/api/v1", server.uri()),
            format!("{}/upload", server.uri()),
        )
        .unwrap();
        VideoGenerator::new(client)
    }

    fn fast_options() -> VideoOptions {
        VideoOptions {
            poll: PollSettings {
                timeout: Duration::from_secs(5),
                poll_interval: Duration::from_millis(10),
            },
            ..Default::default()
        }
    }

    async fn mount_generate(server: &MockServer, task_id: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/veo/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": 200, "data": {"taskId": task_id}})),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn text_to_video_waits_for_completion() {
        let server = MockServer::start().await;
        mount_generate(&server, "veo_t2v").await;
        Mock::given(method("GET"))
            .and(path("/api/v1/veo/record-info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"state": "processing"}
            })))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/veo/record-info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "state": "success",
                    "resultJson": {"resultUrls": ["https://cdn.example/t2v.mp4"]}
                }
            })))
            .mount(&server)
            .await;

        let generator = generator_for(&server);
        let mut checks = 0;
        let job = generator
            .text_to_video("a lighthouse at dusk", fast_options(), |_, attempt| {
                checks = attempt
            })
            .await
            .unwrap();

        assert_eq!(job.task_id, "veo_t2v");
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.primary_url(), Some("https://cdn.example/t2v.mp4"));
        assert_eq!(checks, 3);
    }

    #[tokio::test]
    async fn no_wait_returns_pending_job() {
        let server = MockServer::start().await;
        mount_generate(&server, "veo_nowait").await;
        Mock::given(method("GET"))
            .and(path("/api/v1/veo/record-info"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let generator = generator_for(&server);
        let options = VideoOptions {
            wait: false,
            ..fast_options()
        };
        let job = generator
            .text_to_video("a lighthouse", options, |_, _| {})
            .await
            .unwrap();

        assert_eq!(job.task_id, "veo_nowait");
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.result_urls.is_empty());
    }

    #[tokio::test]
    async fn empty_prompt_rejected_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let generator = generator_for(&server);
        let err = generator
            .text_to_video("   ", fast_options(), |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PollError::Submission(KieError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn image_to_video_uploads_then_submits_reference() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("slide.webp");
        std::fs::write(&image, b"webp-bytes").unwrap();

        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"downloadUrl": "https://files.example/slide.webp"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/veo/generate"))
            .and(body_partial_json(json!({
                "imageUrls": ["https://files.example/slide.webp"],
                "generationType": "REFERENCE_2_VIDEO"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"taskId": "veo_i2v"}})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/veo/record-info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"state": "fail", "failMsg": "image could not be processed"}
            })))
            .mount(&server)
            .await;

        let generator = generator_for(&server);
        let err = generator
            .image_to_video("zoom in slowly", &image, fast_options(), |_, _| {})
            .await
            .unwrap_err();

        match err {
            PollError::JobFailed { task_id, message } => {
                assert_eq!(task_id, "veo_i2v");
                assert_eq!(message, "image could not be processed");
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_failure_is_submission_error() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("slide.png");
        std::fs::write(&image, b"png").unwrap();

        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/veo/generate"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let generator = generator_for(&server);
        let err = generator
            .image_to_video("zoom", &image, fast_options(), |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PollError::Submission(KieError::ApiError { status: 413, .. })
        ));
    }
}
