mod traits_tests;
