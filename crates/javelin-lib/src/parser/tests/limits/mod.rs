mod failure_tests;
mod resource_tests;
