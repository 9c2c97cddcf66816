// Test modules for Solace
// Each module contains extracted unit tests for the corresponding source file

mod controller_tests;
