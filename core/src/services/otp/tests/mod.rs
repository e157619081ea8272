mod attempt_counter_tests;
mod rate_limiter_tests;
mod service_tests;
