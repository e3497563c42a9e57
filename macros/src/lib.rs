mod route;

use proc_macro::TokenStream;

/// Generates the `OpenAPI` operation transform for a route handler, named after
/// the handler with the suffix `_docs`.
///
/// The first line of the handler's doc comment becomes the summary and the
/// remaining lines the description.
///
/// ```rust,ignore
/// /// Get post
/// /// Returns a single post by its unique id.
/// #[route(tag = tag::POST, response(status = 404, description = "Unknown post."))]
/// pub async fn get_post() {}
/// ```
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}
