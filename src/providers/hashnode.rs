use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::ContentSourceConfig;
use crate::errors::FetchError;
use crate::providers::ContentSource;
use crate::translation::model::FetchedContent;

/// Query document sent for every fetch; only the variables change
pub const POST_QUERY: &str = "query Publication($pubName: String!, $slugName: String!) {
  publication(host: $pubName) {
    post(slug: $slugName) {
      title
      content {
        markdown
      }
    }
  }
}";

/// Hashnode GraphQL client
pub struct Hashnode {
    /// HTTP client with the configured request timeout
    client: Client,
    /// Bearer token
    api_token: String,
    /// GraphQL endpoint
    endpoint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryVariables<'a> {
    pub_name: &'a str,
    slug_name: &'a str,
}

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'static str,
    variables: QueryVariables<'a>,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    publication: Option<Publication>,
}

#[derive(Debug, Deserialize)]
struct Publication {
    post: Option<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<PostContent>,
}

#[derive(Debug, Deserialize)]
struct PostContent {
    #[serde(default)]
    markdown: Option<String>,
}

impl Hashnode {
    /// Create a new client from configuration
    pub fn new(config: &ContentSourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Remote {
                status_code: None,
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_token: config.api_token.clone(),
            endpoint: config.endpoint.clone(),
        })
    }
}

impl std::fmt::Debug for Hashnode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hashnode")
            .field("api_token", &"***")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Turn a decoded GraphQL envelope into the post's content
fn extract_content(
    response: GraphqlResponse,
    publication_host: &str,
    post_slug: &str,
) -> Result<FetchedContent, FetchError> {
    let publication = match response.data.and_then(|d| d.publication) {
        Some(publication) => publication,
        None => {
            if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
                let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
                return Err(FetchError::Graphql(messages.join("; ")));
            }
            return Err(FetchError::NotFound(format!(
                "publication '{}' does not exist",
                publication_host
            )));
        }
    };

    let post = publication.post.ok_or_else(|| {
        FetchError::NotFound(format!(
            "post '{}' does not exist in publication '{}'",
            post_slug, publication_host
        ))
    })?;

    let markdown_body = post
        .content
        .and_then(|c| c.markdown)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| {
            FetchError::EmptyContent(format!("post '{}' has no markdown content", post_slug))
        })?;

    let title = post
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| FetchError::EmptyContent(format!("post '{}' has no title", post_slug)))?;

    Ok(FetchedContent {
        title,
        markdown_body,
    })
}

#[async_trait]
impl ContentSource for Hashnode {
    async fn fetch(
        &self,
        publication_host: &str,
        post_slug: &str,
    ) -> Result<FetchedContent, FetchError> {
        debug!("Fetching post '{}' from '{}'", post_slug, publication_host);

        let request = GraphqlRequest {
            query: POST_QUERY,
            variables: QueryVariables {
                pub_name: publication_host,
                slug_name: post_slug,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_token))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Content host error ({}): {}", status, error_text);
            return Err(FetchError::Remote {
                status_code: Some(status.as_u16()),
                message: error_text,
            });
        }

        let body = response
            .json::<GraphqlResponse>()
            .await
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

        extract_content(body, publication_host, post_slug)
    }
}
