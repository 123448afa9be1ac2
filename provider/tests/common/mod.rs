use netdata_core::NetdataClient;

/// Fresh mock cloud on a random port plus a client pointed at it.
pub fn start() -> (NetdataClient, mock_server::Db) {
    let db = mock_server::new_db();
    let addr = mock_server::spawn(db.clone()).unwrap();
    let client = NetdataClient::new(&format!("http://{addr}"), "test-token");
    (client, db)
}

pub fn requests(db: &mock_server::Db) -> Vec<String> {
    db.blocking_read().requests().to_vec()
}
