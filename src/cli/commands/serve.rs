use crate::server;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or_else(server::port_from_env);
    server::serve(port).await
}
