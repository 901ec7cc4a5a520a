//! Compile-time dependency injection macros.
//!
//! - `#[derive(Context)]` turns every field of a root struct into something
//!   resolvable through `FromRef`.
//! - `#[derive(FromContext)]` builds a repository or service by resolving
//!   each of its fields from the root context.
//!
//! Generated code refers to `crate::FromRef`, so the consuming crate must
//! define or re-export that trait at its root.

use proc_macro::TokenStream;

mod context;
mod from_context;

/// Derive macro for the DI root.
///
/// Generates one `FromRef<Root>` impl per field type, cloning the field out
/// of the root. Every field must be `Clone`.
///
/// # Example
///
/// ```ignore
/// #[derive(Context, Clone)]
/// pub struct Context {
///     pub repository: Arc<dyn ProjectPresentationRepository>,
///     pub config: Arc<Config>,
/// }
///
/// // impl FromRef<Context> for Arc<dyn ProjectPresentationRepository> { ... }
/// // impl FromRef<Context> for Arc<Config> { ... }
/// ```
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    context::derive_context_impl(input)
}

/// Derive macro for types assembled from the DI root.
///
/// Generates `impl FromRef<Context> for T` that resolves each named field
/// with `<FieldType as FromRef<Context>>::from_ref(ctx)`. The root type
/// defaults to `Context` in the deriving module's scope and can be changed
/// with `#[from_context(Context = "OtherContext")]`.
///
/// # Example
///
/// ```ignore
/// #[derive(FromContext, Clone)]
/// pub struct ProjectPresentationService {
///     repository: AppRepository,
/// }
///
/// let service = ProjectPresentationService::from_ref(&ctx);
/// ```
#[proc_macro_derive(FromContext, attributes(from_context))]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    from_context::derive_from_context_impl(input)
}
