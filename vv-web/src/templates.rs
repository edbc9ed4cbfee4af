use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub filename: String,
    pub row_count: usize,
    pub download_url: String,
}
