mod jwks_tests;
mod token_tests;
