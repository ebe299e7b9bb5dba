//! 요청 파이프라인용 토큰 가드
//!
//! gRPC 요청을 가로채서 access 토큰을 검증하고, 사용자 식별자를 요청에
//! 추가합니다. 공개 라우트 목록은 런타임 데이터로 관리하며, 파이프라인이
//! 라우트마다 인증 필요 여부를 조회해서 인터셉터 적용을 결정합니다.

use std::collections::HashSet;

use tonic::{metadata::MetadataMap, metadata::MetadataValue, service::Interceptor, Request, Status};
use tracing::{error, info};

use crate::auth::token::TokenService;
use crate::auth::types::TokenKind;

/// Access 토큰이 실리는 메타데이터 필드
pub const ACCESS_TOKEN_FIELD: &str = "authentication";
/// Refresh 토큰이 실리는 메타데이터 필드
pub const REFRESH_TOKEN_FIELD: &str = "refresh";
/// 검증 후 주입되는 사용자 식별자 필드
pub const USER_EMAIL_FIELD: &str = "user-email";

/// 라우트별 인증 필요 여부
///
/// 허용 목록에 오른 라우트만 공개이고, 목록에 없는 라우트는 전부
/// 인증 대상입니다 (기본 닫힘).
#[derive(Debug, Clone, Default)]
pub struct RouteAuthPolicy {
    public_routes: HashSet<String>,
}

impl RouteAuthPolicy {
    pub fn new<I, S>(public_routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            public_routes: public_routes.into_iter().map(Into::into).collect(),
        }
    }

    /// 해당 라우트가 access 토큰 검증을 요구하는지 반환합니다.
    pub fn requires_auth(&self, route: &str) -> bool {
        !self.public_routes.contains(route)
    }
}

/// JWT Access 토큰 검증 인터셉터
///
/// 요청의 `authentication` 필드에서 토큰을 꺼내 검증하고, 성공하면
/// 사용자 이메일을 요청 메타데이터에 추가합니다. 인증이 필요한
/// 라우트에만 적용합니다.
pub fn access_token_interceptor(token_service: TokenService) -> impl Interceptor {
    move |mut req: Request<()>| {
        let token = extract_token(req.metadata(), ACCESS_TOKEN_FIELD)?;

        match token_service.verify(&token, TokenKind::Access) {
            Ok(claims) => {
                info!("access 토큰 검증 성공: email={}", claims.sub);

                req.metadata_mut().insert(
                    USER_EMAIL_FIELD,
                    claims
                        .sub
                        .parse()
                        .unwrap_or_else(|_| MetadataValue::from_static("")),
                );

                Ok(req)
            }
            Err(e) => {
                error!("access 토큰 검증 실패: error={}", e);
                Err(Status::unauthenticated("Invalid or expired token"))
            }
        }
    }
}

/// 요청에서 refresh 토큰을 꺼내 서명/만료를 검증합니다.
///
/// 저장된 해시와의 대조는 별도 단계이며, 여기서는 토큰 자체의 유효성만
/// 확인합니다.
pub fn verify_refresh_request(
    metadata: &MetadataMap,
    token_service: &TokenService,
) -> Result<(String, String), Status> {
    let token = extract_token(metadata, REFRESH_TOKEN_FIELD)?;

    match token_service.verify(&token, TokenKind::Refresh) {
        Ok(claims) => Ok((token, claims.sub)),
        Err(e) => {
            error!("refresh 토큰 검증 실패: error={}", e);
            Err(Status::unauthenticated("Invalid or expired token"))
        }
    }
}

/// 요청 메타데이터에서 토큰 값을 추출합니다.
///
/// # Arguments
/// * `metadata` - gRPC 요청 메타데이터
/// * `field` - 토큰이 실린 필드 이름
///
/// # Returns
/// * `Result<String, Status>` - 추출된 토큰 또는 에러
pub fn extract_token(metadata: &MetadataMap, field: &str) -> Result<String, Status> {
    let value = metadata
        .get(field)
        .ok_or_else(|| Status::unauthenticated(format!("Missing {field} metadata")))?;

    let token = value
        .to_str()
        .map_err(|_| Status::invalid_argument(format!("Invalid {field} metadata")))?;

    if token.is_empty() {
        return Err(Status::invalid_argument("Empty token"));
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn token_service() -> TokenService {
        TokenService::new(&AuthConfig {
            access_token_secret: "a".repeat(40),
            access_token_ttl_secs: 900,
            refresh_token_secret: "b".repeat(40),
            refresh_token_ttl_secs: 86_400,
            kakao_rest_key: "rest-key".into(),
            kakao_redirect_uri: "http://localhost:5000/api/auth/kakao/redirect-auth".into(),
            ncp_access_key: "access".into(),
            ncp_secret_key: "ncp".into(),
            ncp_sms_uri: "/sms/v2/services/svc/messages".into(),
            ncp_sms_url: "https://sens.apigw.ntruss.com/sms/v2/services/svc/messages".into(),
            ncp_sms_from: "01000000000".into(),
            auth_code_ttl_secs: 300,
        })
    }

    #[test]
    fn unknown_routes_default_to_protected() {
        let policy = RouteAuthPolicy::new(["auth.login", "auth.signup", "auth.refresh"]);

        assert!(!policy.requires_auth("auth.login"));
        assert!(!policy.requires_auth("auth.signup"));
        assert!(policy.requires_auth("user.me"));
        assert!(policy.requires_auth("route.that.does.not.exist"));
    }

    #[test]
    fn interceptor_accepts_valid_token_and_injects_email() {
        let tokens = token_service();
        let access = tokens.issue_access_token("user@example.com").expect("issue");

        let mut req = Request::new(());
        req.metadata_mut()
            .insert(ACCESS_TOKEN_FIELD, access.parse().expect("ascii"));

        let mut interceptor = access_token_interceptor(tokens);
        let passed = interceptor.call(req).expect("valid token passes");

        let email = passed
            .metadata()
            .get(USER_EMAIL_FIELD)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert_eq!(email, "user@example.com");
    }

    #[test]
    fn interceptor_rejects_missing_and_garbage_tokens() {
        let tokens = token_service();
        let mut interceptor = access_token_interceptor(tokens);

        let bare = Request::new(());
        assert!(interceptor.call(bare).is_err());

        let mut req = Request::new(());
        req.metadata_mut()
            .insert(ACCESS_TOKEN_FIELD, "garbage".parse().expect("ascii"));
        let err = interceptor.call(req).unwrap_err();
        assert_eq!(err.code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn refresh_field_is_separate_from_access_field() {
        let tokens = token_service();
        let refresh = tokens.issue_refresh_token("user@example.com").expect("issue");

        let mut req = Request::new(());
        req.metadata_mut()
            .insert(REFRESH_TOKEN_FIELD, refresh.parse().expect("ascii"));

        let (token, email) =
            verify_refresh_request(req.metadata(), &tokens).expect("refresh verifies");
        assert_eq!(token, refresh);
        assert_eq!(email, "user@example.com");

        // access 토큰을 refresh 자리에 실으면 거부된다
        let access = tokens.issue_access_token("user@example.com").expect("issue");
        let mut wrong = Request::new(());
        wrong
            .metadata_mut()
            .insert(REFRESH_TOKEN_FIELD, access.parse().expect("ascii"));
        assert!(verify_refresh_request(wrong.metadata(), &tokens).is_err());
    }
}
