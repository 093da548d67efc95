//! Operator tests kept out of the implementation files.


#[test]
fn init_tracing_is_idempotent() {
    crate::init_tracing();
    crate::init_tracing();
}
