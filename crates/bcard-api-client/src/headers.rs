use reqwest::RequestBuilder;

/// Legacy header name used by the bcard service instead of `Authorization`.
pub(crate) const AUTH_TOKEN_HEADER: &str = "x-auth-token";

pub(crate) fn add_auth_token_header(builder: RequestBuilder, token: &str) -> RequestBuilder {
    builder.header(AUTH_TOKEN_HEADER, token)
}
