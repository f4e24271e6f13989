// Container test module
#[cfg(test)]
mod container_tests;
#[cfg(test)]
mod capability_tests;
