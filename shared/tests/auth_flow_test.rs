//! 인증 흐름 통합 테스트
//!
//! 인메모리 저장소/게이트웨이로 로그인 → 갱신 → 로그아웃 전체 흐름과
//! 전화번호 인증 부채널을 검증합니다. 외부 인프라 없이 실행됩니다.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use shared::auth::types::{KakaoAccount, KakaoProfile, KakaoProfileDetail, TokenKind};
use shared::auth::AuthService;
use shared::config::AuthConfig;
use shared::model::RegisterInput;
use shared::service::memory::{MemoryCodeStore, MemoryUserStore};
use shared::service::PhoneVerifyService;
use shared::tool::error::AppError;
use shared::traits::{SmsGateway, UserStore};
use shared::Credential;

fn test_config() -> AuthConfig {
    AuthConfig {
        access_token_secret: "0123456789abcdef0123456789abcdef-access".into(),
        access_token_ttl_secs: 900,
        refresh_token_secret: "fedcba9876543210fedcba9876543210-refresh".into(),
        refresh_token_ttl_secs: 86_400,
        kakao_rest_key: "rest-key".into(),
        kakao_redirect_uri: "http://localhost:5000/api/auth/kakao/redirect-auth".into(),
        ncp_access_key: "access".into(),
        ncp_secret_key: "ncp".into(),
        ncp_sms_uri: "/sms/v2/services/svc/messages".into(),
        ncp_sms_url: "https://sens.apigw.ntruss.com/sms/v2/services/svc/messages".into(),
        ncp_sms_from: "01000000000".into(),
        auth_code_ttl_secs: 300,
    }
}

/// 발송 성공/실패를 전환할 수 있는 테스트 게이트웨이
struct ToggleGateway {
    fail: AtomicBool,
}

#[async_trait]
impl SmsGateway for ToggleGateway {
    async fn send(&self, _phone_number: &str, _content: &str) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(AppError::ExternalApi("SMS 게이트웨이 응답 502".into()))
        } else {
            Ok(())
        }
    }
}

async fn registered_service() -> (AuthService, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let service = AuthService::new(&test_config(), store.clone()).expect("service");
    service
        .local_auth()
        .register(RegisterInput {
            email: "user@example.com".into(),
            username: "tester".into(),
            password: "password1".into(),
            phone_number: "010-1111-2222".into(),
        })
        .await
        .expect("register");
    (service, store)
}

#[tokio::test]
async fn full_session_lifecycle() {
    shared::logging::init().expect("logging init");
    let (service, store) = registered_service().await;

    // 로그인: 토큰 쌍 발급 + refresh 해시 바인딩
    let login = service
        .login(Credential::Password {
            email: "user@example.com".into(),
            password: "password1".into(),
        })
        .await
        .expect("login");

    let claims = service
        .token_service()
        .verify(&login.access_token, TokenKind::Access)
        .expect("access token verifies");
    assert_eq!(claims.sub, "user@example.com");

    // 갱신: 새 쌍 발급 + 회전으로 이전 refresh 토큰 폐기
    let refreshed = service.refresh(&login.refresh_token).await.expect("refresh");
    assert!(service.refresh(&login.refresh_token).await.is_err());

    // 로그아웃 후에는 어떤 refresh 토큰도 통하지 않는다
    service.logout("user@example.com").await.expect("logout");
    assert!(service.refresh(&refreshed.refresh_token).await.is_err());

    let user = store
        .find_by_email("user@example.com")
        .await
        .expect("find")
        .expect("exists");
    assert!(user.refresh_token_hash.is_none());
}

#[tokio::test]
async fn two_device_login_keeps_only_latest_session() {
    let (service, _store) = registered_service().await;

    let device_a = service
        .login(Credential::Password {
            email: "user@example.com".into(),
            password: "password1".into(),
        })
        .await
        .expect("device a login");
    let device_b = service
        .login(Credential::Password {
            email: "user@example.com".into(),
            password: "password1".into(),
        })
        .await
        .expect("device b login");

    // 계정당 refresh 토큰은 하나: 나중 로그인이 이전 세션을 대체한다
    assert!(service.refresh(&device_a.refresh_token).await.is_err());
    assert!(service.refresh(&device_b.refresh_token).await.is_ok());
}

#[tokio::test]
async fn kakao_login_provisions_once_and_shares_session_model() {
    let store = Arc::new(MemoryUserStore::new());
    let service = AuthService::new(&test_config(), store.clone()).expect("service");

    let profile = KakaoProfile {
        id: 31337,
        kakao_account: KakaoAccount {
            email: Some("kakao@example.com".into()),
            profile: Some(KakaoProfileDetail {
                nickname: Some("카카오유저".into()),
                profile_image_url: None,
            }),
        },
    };

    let first = service.resolve_kakao_user(&profile).await.expect("create");
    let second = service.resolve_kakao_user(&profile).await.expect("find");
    assert_eq!(first, second);
    assert_eq!(store.user_count().await, 1);

    // 카카오 계정도 비밀번호 경로와 동일한 세션 모델을 쓴다
    let user = store
        .find_by_email("kakao@example.com")
        .await
        .expect("find")
        .expect("exists");
    assert!(user.kakao_id == Some(31337));
    assert!(!user.password_hash.is_empty());
}

#[tokio::test]
async fn phone_verification_side_channel() {
    let cache = Arc::new(MemoryCodeStore::new());
    let gateway = Arc::new(ToggleGateway {
        fail: AtomicBool::new(false),
    });
    let service = PhoneVerifyService::new(cache.clone(), gateway.clone(), 300);

    // 정상 발송: 반환된 코드만 통과한다
    let code = service.send_code("010-1111-2222").await.expect("send");
    assert!(service.check_code("010-1111-2222", &code).await.expect("check"));

    // 재발송하면 두 번째 코드만 유효하다
    let newer = service.send_code("010-1111-2222").await.expect("resend");
    assert!(service.check_code("010-1111-2222", &newer).await.expect("check"));
    if code != newer {
        assert!(!service.check_code("010-1111-2222", &code).await.expect("check"));
    }

    // 게이트웨이 장애: 에러가 나고 이전 항목도 남지 않는다
    gateway.fail.store(true, Ordering::SeqCst);
    let err = service.send_code("010-1111-2222").await.unwrap_err();
    assert!(matches!(err, AppError::ExternalApi(_)));
    assert!(!service.check_code("010-1111-2222", &newer).await.expect("check"));
}
