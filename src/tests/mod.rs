pub mod support;

mod routes;
