use crate::news::PAGE_SIZE;
use url::Url;

/// Query parameters accepted by the relay's news route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyParams {
    /// Free-form category; `all` (the default) means no filter.
    pub category: String,
    pub page: u32,
    pub page_size: u32,
    pub q: Option<String>,
}

impl Default for ProxyParams {
    fn default() -> Self {
        Self {
            category: "all".to_string(),
            page: 1,
            page_size: PAGE_SIZE,
            q: None,
        }
    }
}

impl ProxyParams {
    /// Parse a raw query string. Unknown keys are ignored; unparseable
    /// numbers and empty values fall back to the defaults.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(raw) = raw else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "category" if !value.trim().is_empty() => {
                    params.category = value.trim().to_string();
                }
                "page" => {
                    if let Some(page) = parse_positive(&value) {
                        params.page = page;
                    }
                }
                "pageSize" => {
                    if let Some(size) = parse_positive(&value) {
                        params.page_size = size;
                    }
                }
                "q" if !value.is_empty() => params.q = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// Build the upstream `top-headlines` URL. Country is fixed to `us`.
    pub fn upstream_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        {
            let mut segments = url.path().trim_end_matches('/').to_string();
            segments.push_str("/top-headlines");
            url.set_path(&segments);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &self.page.to_string());
            pairs.append_pair("pageSize", &self.page_size.to_string());
            pairs.append_pair("country", "us");
            if !self.category.eq_ignore_ascii_case("all") {
                pairs.append_pair("category", &self.category);
            }
            if let Some(q) = &self.q {
                pairs.append_pair("q", q);
            }
        }
        url
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}
