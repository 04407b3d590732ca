//! Method path vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use aclgate_core::protocol::MethodPath;


#[test]
fn method_vectors() {
    for v in vector_loader::load_method_vectors() {
        let res = MethodPath::parse(&v.path);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.client_code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let path = res.expect("expected ok path");
        let ex = v.expect.expect("missing expect block");
        assert_eq!(path.service(), ex.service, "vector={}", v.description);
        assert_eq!(path.method(), ex.method, "vector={}", v.description);
        assert_eq!(path.as_str(), v.path, "vector={}", v.description);
    }
}

#[test]
fn display_is_the_full_path() {
    let p = MethodPath::parse("/Admin/Logging").unwrap();
    assert_eq!(p.to_string(), "/Admin/Logging");
}
