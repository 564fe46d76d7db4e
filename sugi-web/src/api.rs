use async_trait::async_trait;
use sugi_client::api::{Backend, Comment, Error, Essay, EssayForm, EssayId, NewComment};

/// HTTP implementation of the backend contract, speaking the server's json
/// error protocol. Cheap to construct; the underlying reqwest client is
/// the process-wide `crate::CLIENT`.
#[derive(Clone, Debug)]
pub struct Client {
    base: String,
    admin_token: Option<String>,
}

impl Client {
    pub fn new(base: String, admin_token: Option<String>) -> Client {
        Client { base, admin_token }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base, path)
    }
}

fn net_err(e: reqwest::Error) -> Error {
    Error::Unknown(format!("network error: {e}"))
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.bytes().await.map_err(net_err)?;
    Err(Error::parse(&body)
        .unwrap_or_else(|_| Error::Unknown(format!("got http status {status}"))))
}

async fn json<T>(resp: reqwest::Response) -> Result<T, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    check(resp)
        .await?
        .json()
        .await
        .map_err(|e| Error::Unknown(format!("failed parsing server response: {e}")))
}

#[async_trait(?Send)]
impl Backend for Client {
    async fn list_essays(&self, limit: Option<usize>) -> Result<Vec<Essay>, Error> {
        let mut req = crate::CLIENT.get(self.url("essays"));
        if let Some(limit) = limit {
            req = req.query(&[("limit", limit)]);
        }
        json(req.send().await.map_err(net_err)?).await
    }

    async fn get_essay(&self, id: EssayId) -> Result<Option<Essay>, Error> {
        let resp = crate::CLIENT
            .get(self.url(&format!("essays/{}", id.0)))
            .send()
            .await
            .map_err(net_err)?;
        match json(resp).await {
            Ok(essay) => Ok(Some(essay)),
            Err(Error::EssayNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_essay(&self, form: EssayForm) -> Result<Essay, Error> {
        let resp = crate::CLIENT
            .post(self.url("essays"))
            .json(&form)
            .send()
            .await
            .map_err(net_err)?;
        json(resp).await
    }

    async fn delete_essay(&self, id: EssayId) -> Result<(), Error> {
        let token = self.admin_token.as_ref().ok_or(Error::PermissionDenied)?;
        let resp = crate::CLIENT
            .delete(self.url(&format!("essays/{}", id.0)))
            .bearer_auth(token)
            .send()
            .await
            .map_err(net_err)?;
        check(resp).await?;
        Ok(())
    }

    async fn like_essay(&self, id: EssayId) -> Result<i64, Error> {
        let resp = crate::CLIENT
            .post(self.url(&format!("essays/{}/like", id.0)))
            .send()
            .await
            .map_err(net_err)?;
        json(resp).await
    }

    async fn unlike_essay(&self, id: EssayId) -> Result<i64, Error> {
        let resp = crate::CLIENT
            .post(self.url(&format!("essays/{}/unlike", id.0)))
            .send()
            .await
            .map_err(net_err)?;
        json(resp).await
    }

    async fn list_comments(&self, essay: EssayId) -> Result<Vec<Comment>, Error> {
        let resp = crate::CLIENT
            .get(self.url(&format!("essays/{}/comments", essay.0)))
            .send()
            .await
            .map_err(net_err)?;
        json(resp).await
    }

    async fn create_comment(&self, essay: EssayId, c: NewComment) -> Result<Comment, Error> {
        let resp = crate::CLIENT
            .post(self.url(&format!("essays/{}/comments", essay.0)))
            .json(&c)
            .send()
            .await
            .map_err(net_err)?;
        json(resp).await
    }
}
