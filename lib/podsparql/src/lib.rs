#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod config;
pub mod endpoint;
mod error;
pub mod federated;
mod fetch;
pub mod normalize;
pub mod pattern;
pub mod resource;
mod results;
mod router;
mod service;
mod session;
pub mod store;
pub mod vocab;

pub use config::{Credentials, QueryConfig, ServiceOptions};
pub use error::{FetchError, PodQueryError};
pub use fetch::{AuthenticatedFetch, FetchRequest, FetchResponse, HttpFetch};
pub use pattern::TriplePattern;
pub use results::{BindingRow, QueryResult};
pub use router::{route, QueryRoute};
pub use service::PodQueryService;
pub use session::{Session, SessionManager};

pub mod model {
    pub use oxrdf::{
        BlankNode, Literal, NamedNode, NamedNodeRef, Subject, Term, TermRef, Triple, TripleRef,
        Variable,
    };
}
