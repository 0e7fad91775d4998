
mod node_tests;
mod parallel_tests;
