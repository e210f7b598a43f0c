//! protomap-resolver - Cross-tree Java class hierarchy resolution
//!
//! Decides whether a domain field is reachable directly or needs accessor methods:
//! - [`SourceRoots`] locates class files across an ordered list of roots
//! - [`CompilationUnit`] reads declarations out of a `.java` file
//! - [`HierarchyResolver`] walks superclass chains, falling back to a
//!   [`TypeIntrospector`] when a superclass has no source
//! - [`CachingResolver`] memoizes answers for repeated queries

mod cache;
mod error;
mod introspect;
mod lexer;
mod locate;
mod resolver;
mod source;

pub use cache::CachingResolver;
pub use error::{ResolveError, ResolveResult};
pub use introspect::{
    ClassRegistry, NoIntrospection, RuntimeClass, RuntimeField, RuntimeLookup, TypeIntrospector,
    find_runtime_field,
};
pub use locate::{LocatedClass, SourceRoots};
pub use resolver::{FieldOrigin, HierarchyResolver, VisibilityQuery, VisibilityResolution};
pub use source::{
    CompilationUnit, FieldDecl, ImportDecl, ParseError, TypeDecl, TypeKind, Visibility,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CachingResolver, ClassRegistry, HierarchyResolver, ResolveError, ResolveResult,
        SourceRoots, TypeIntrospector, Visibility, VisibilityQuery, VisibilityResolution,
    };
}
