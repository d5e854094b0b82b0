#![allow(missing_docs)]

pub(crate) mod server;

pub(crate) use server::{
    TEST_PASSWORD, create_test_transaction, get_test_server, register_test_user,
};
