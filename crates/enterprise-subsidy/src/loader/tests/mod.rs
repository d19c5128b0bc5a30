mod common;

mod graph;
