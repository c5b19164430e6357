use reqwest::Url;

use crate::error::ResearchError;
use crate::models::ResearchRequest;

/// Upper-case the first character of `s`, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Validate a raw website string into an absolute http(s) URL.
pub(crate) fn validate_website(raw: &str) -> Result<Url, ResearchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ResearchError::InvalidInput(
            "company website is required".to_string(),
        ));
    }
    let url = Url::parse(trimmed).map_err(|_| {
        ResearchError::InvalidInput(format!("'{trimmed}' is not an absolute URL"))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ResearchError::InvalidInput(format!(
            "unsupported URL scheme '{other}', expected http or https"
        ))),
    }
}

/// Derive a display name for the company from its website host: one leading
/// `www.` label is stripped, the first remaining label is taken and its first
/// character upper-cased. `https://www.example.com/about` becomes `Example`.
pub fn company_name_from_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let label = host.split('.').next().unwrap_or(host);
    capitalize_first(label)
}

impl ResearchRequest {
    /// Build a validated request from a raw website string. The company name
    /// is derived from the host and the website is sent in canonical URL
    /// form.
    pub fn from_website(
        raw: &str,
        products: Option<Vec<String>>,
    ) -> Result<Self, ResearchError> {
        let url = validate_website(raw)?;
        Ok(Self {
            company_name: company_name_from_url(&url),
            company_website: url.to_string(),
            products,
        })
    }

    /// Build a validated request with an explicitly supplied company name
    /// instead of the derived one.
    pub fn named(
        company_name: impl Into<String>,
        raw: &str,
        products: Option<Vec<String>>,
    ) -> Result<Self, ResearchError> {
        let url = validate_website(raw)?;
        Ok(Self {
            company_name: company_name.into(),
            company_website: url.to_string(),
            products,
        })
    }
}
