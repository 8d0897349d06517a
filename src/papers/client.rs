use super::error::{SearchError, UploadError};
use super::query::build_query;
use super::schema::{FilterCriteria, PaperMetadata, PaperRecord};
use super::upload::{check_candidate, UploadCandidate};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};

/// Remote store of past papers.
#[async_trait]
pub trait PaperRepository: Send + Sync {
    /// Fetch every paper matching `criteria`.
    async fn search(&self, criteria: &FilterCriteria) -> Result<Vec<PaperRecord>, SearchError>;

    /// Submit a paper. The file must already be selected and within the size limit.
    async fn upload(
        &self,
        metadata: &PaperMetadata,
        file: &UploadCandidate,
    ) -> Result<(), UploadError>;
}

/// HTTP client for the `/api/papers` and `/api/upload` endpoints.
///
/// No timeout is configured; requests rely on the transport defaults.
#[derive(Debug, Clone)]
pub struct HttpPaperClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPaperClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.backend_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn papers_url(&self, criteria: &FilterCriteria) -> String {
        format!("{}/api/papers?{}", self.base_url, build_query(criteria))
    }

    pub fn upload_url(&self) -> String {
        format!("{}/api/upload", self.base_url)
    }
}

#[async_trait]
impl PaperRepository for HttpPaperClient {
    async fn search(&self, criteria: &FilterCriteria) -> Result<Vec<PaperRecord>, SearchError> {
        let url = self.papers_url(criteria);
        debug!(%url, "searching papers");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = resp.bytes().await?;
        let papers = decode_papers(&body)?;
        debug!(count = papers.len(), "search returned");
        Ok(papers)
    }

    async fn upload(
        &self,
        metadata: &PaperMetadata,
        file: &UploadCandidate,
    ) -> Result<(), UploadError> {
        let file = check_candidate(Some(file))?;

        let meta = Part::text(serde_json::to_string(metadata)?).mime_str("application/json")?;
        let body = Part::bytes(file.data().to_vec())
            .file_name(file.file_name().to_string())
            .mime_str(file.mime_type())?;
        let form = Form::new().part("meta", meta).part("file", body);

        let url = self.upload_url();
        debug!(%url, file = file.file_name(), size = file.size(), "uploading paper");

        let resp = self.http.post(&url).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "upload rejected");
            return Err(UploadError::Rejected { status });
        }

        info!(title = %metadata.title, "paper uploaded");
        Ok(())
    }
}

/// Decode a search body. Only a body that is not a JSON array fails;
/// elements that are not records are skipped.
fn decode_papers(body: &[u8]) -> Result<Vec<PaperRecord>, SearchError> {
    let items: Vec<serde_json::Value> = serde_json::from_slice(body)?;
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(paper) => Some(paper),
            Err(e) => {
                warn!("skipping malformed paper: {e}");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let client = HttpPaperClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.upload_url(), "http://localhost:5000/api/upload");

        let criteria = FilterCriteria {
            branch: "IT".into(),
            ..Default::default()
        };
        assert_eq!(
            client.papers_url(&criteria),
            "http://localhost:5000/api/papers?branch=IT"
        );
        assert_eq!(
            client.papers_url(&FilterCriteria::default()),
            "http://localhost:5000/api/papers?"
        );
    }

    #[test]
    fn search_body_decodes_leniently() {
        let body = br#"[
            {"id":"a","title":"OS","year":2021},
            {"id":"b","title":null,"year":"2020"},
            "not a record",
            {"title":"CN","semester":5}
        ]"#;
        let papers = decode_papers(body).unwrap();
        let titles: Vec<&str> = papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["OS", "", "CN"]);
        assert_eq!(papers[1].year, "2020");
        assert_eq!(papers[2].semester, "5");
    }

    #[test]
    fn non_array_body_is_a_decode_error() {
        assert!(matches!(
            decode_papers(br#"{"error":"boom"}"#),
            Err(SearchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn oversized_upload_fails_before_sending() {
        // Nothing listens on port 9; reaching the network would be a transport error.
        let client = HttpPaperClient::new("http://127.0.0.1:9");
        let meta = PaperMetadata {
            title: "t".into(),
            branch: crate::papers::Branch::Me,
            subject: "s".into(),
            year: 2020,
            semester: 1,
            exam_type: None,
        };
        let file = UploadCandidate::new(
            "big.pdf",
            vec![0; crate::papers::MAX_UPLOAD_BYTES as usize + 1],
        );
        let err = client.upload(&meta, &file).await.unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));
    }
}
