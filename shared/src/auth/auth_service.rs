//! 인증 오케스트레이션 서비스
//!
//! 자격 증명 검증 → 토큰 쌍 발급 → refresh 해시 바인딩으로 이어지는
//! 세션 수립 흐름을 담당합니다. 카카오 로그인도 자격 증명 검증 방법만
//! 다를 뿐 같은 세션 모델을 사용합니다.

use std::sync::Arc;

use tracing::info;

use crate::auth::kakao_auth::KakaoAuthClient;
use crate::auth::local_auth::{LocalAuthService, HASH_COST};
use crate::auth::refresh::RefreshTokenBinder;
use crate::auth::token::TokenService;
use crate::auth::types::{Credential, KakaoProfile, TokenKind};
use crate::config::AuthConfig;
use crate::model::{LoginOutcome, NewUser, UserSummary};
use crate::tool::error::AppError;
use crate::tool::random_code::{random_password, RANDOM_PASSWORD_LEN};
use crate::traits::UserStore;

/// 로그인/갱신/로그아웃 흐름을 묶는 서비스
pub struct AuthService {
    store: Arc<dyn UserStore>,
    local: LocalAuthService,
    binder: RefreshTokenBinder,
    tokens: TokenService,
    kakao: KakaoAuthClient,
}

impl AuthService {
    pub fn new(config: &AuthConfig, store: Arc<dyn UserStore>) -> Result<Self, AppError> {
        Ok(Self {
            local: LocalAuthService::new(store.clone()),
            binder: RefreshTokenBinder::new(store.clone()),
            tokens: TokenService::new(config),
            kakao: KakaoAuthClient::new(config)?,
            store,
        })
    }

    pub fn token_service(&self) -> &TokenService {
        &self.tokens
    }

    pub fn kakao_client(&self) -> &KakaoAuthClient {
        &self.kakao
    }

    pub fn local_auth(&self) -> &LocalAuthService {
        &self.local
    }

    /// 자격 증명으로 로그인하고 세션을 수립합니다.
    ///
    /// 어떤 변형이든 검증에 성공하면 이후 단계(토큰 발급, 바인딩)는
    /// 동일합니다.
    pub async fn login(&self, credential: Credential) -> Result<LoginOutcome, AppError> {
        let user = match credential {
            Credential::Password { email, password } => {
                self.local.validate_user(&email, &password).await?
            }
            Credential::Kakao { access_token } => {
                let profile = self.kakao.fetch_profile(&access_token).await?;
                self.resolve_kakao_user(&profile).await?
            }
        };

        self.establish_session(user).await
    }

    /// 인가 코드부터 시작하는 카카오 로그인 전체 흐름입니다.
    ///
    /// 코드 교환과 프로필 조회 중 어느 단계가 실패해도 에러가 그대로
    /// 호출자에게 전파됩니다. 세션이 만들어지지 않았는데 성공으로
    /// 보이는 일은 없습니다.
    pub async fn kakao_login_with_code(&self, code: &str) -> Result<LoginOutcome, AppError> {
        let kakao_tokens = self.kakao.exchange_code(code).await?;
        let profile = self.kakao.fetch_profile(&kakao_tokens.access_token).await?;
        let user = self.resolve_kakao_user(&profile).await?;
        self.establish_session(user).await
    }

    /// 카카오 프로필로 계정을 찾거나 새로 만듭니다.
    ///
    /// 최초 로그인 시에만 계정이 생성됩니다. 임시 비밀번호는 저장만 되고
    /// 사용자에게 노출되지 않습니다. 이메일/닉네임 중복 충돌은 `Conflict`.
    pub async fn resolve_kakao_user(
        &self,
        profile: &KakaoProfile,
    ) -> Result<UserSummary, AppError> {
        if let Some(user) = self.store.find_by_kakao_id(profile.id).await? {
            return Ok(user.summary());
        }

        let email = profile
            .kakao_account
            .email
            .clone()
            .ok_or_else(|| {
                AppError::InvalidInput("카카오 계정에 이메일 제공 동의가 필요합니다".to_string())
            })?;

        let password_hash = bcrypt::hash(random_password(RANDOM_PASSWORD_LEN), HASH_COST)?;
        let user = self
            .store
            .create(&NewUser {
                email,
                username: profile.nickname(),
                phone_number: String::new(),
                password_hash,
                kakao_id: Some(profile.id),
            })
            .await?;

        info!("카카오 신규 계정 생성: user_id={}", user.user_id);
        Ok(user.summary())
    }

    /// refresh 토큰으로 세션을 갱신합니다.
    ///
    /// 서명/만료 검증과 저장된 해시 대조는 별개의 검사이며 둘 다
    /// 통과해야 합니다. 성공하면 새 토큰 쌍을 발급하고 refresh 해시를
    /// 새 값으로 교체합니다(회전). 이전 refresh 토큰은 그 시점부터
    /// 무효입니다.
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginOutcome, AppError> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        let user = self.binder.verify_and_fetch(refresh_token, &claims.sub).await?;
        self.establish_session(user.summary()).await
    }

    /// 로그아웃: 계정의 refresh 토큰 바인딩을 해제합니다. 멱등입니다.
    pub async fn logout(&self, email: &str) -> Result<(), AppError> {
        self.binder.unbind(email).await?;
        info!("로그아웃 완료: email={}", email);
        Ok(())
    }

    /// 토큰 쌍을 발급하고 refresh 해시를 바인딩합니다.
    ///
    /// 외부 네트워크 호출이 모두 끝난 뒤에만 저장소를 건드립니다.
    async fn establish_session(&self, user: UserSummary) -> Result<LoginOutcome, AppError> {
        let pair = self.tokens.issue_pair(&user.email)?;
        self.binder.bind(&user.email, &pair.refresh_token).await?;

        Ok(LoginOutcome {
            email: user.email,
            username: user.username,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::{KakaoAccount, KakaoProfileDetail};
    use crate::model::RegisterInput;
    use crate::service::memory::MemoryUserStore;

    fn test_config() -> AuthConfig {
        AuthConfig {
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
        }
    }

    fn kakao_profile(id: i64) -> KakaoProfile {
        KakaoProfile {
            id,
            kakao_account: KakaoAccount {
                email: Some(format!("kakao{id}@example.com")),
                profile: Some(KakaoProfileDetail {
                    nickname: Some("카카오유저".into()),
                    profile_image_url: None,
                }),
            },
        }
    }

    async fn service_with_user() -> (AuthService, Arc<MemoryUserStore>) {
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
    async fn password_login_establishes_session() {
        let (service, store) = service_with_user().await;

        let outcome = service
            .login(Credential::Password {
                email: "user@example.com".into(),
                password: "password1".into(),
            })
            .await
            .expect("login");

        // access 토큰은 해당 계정 앞으로 발급된다
        let claims = service
            .token_service()
            .verify(&outcome.access_token, TokenKind::Access)
            .expect("claims");
        assert_eq!(claims.sub, "user@example.com");

        // refresh 해시가 계정에 바인딩된다
        let user = store
            .find_by_email("user@example.com")
            .await
            .expect("find")
            .expect("exists");
        assert!(user.refresh_token_hash.is_some());
    }

    #[tokio::test]
    async fn refresh_rotates_the_refresh_token() {
        let (service, _store) = service_with_user().await;

        let first = service
            .login(Credential::Password {
                email: "user@example.com".into(),
                password: "password1".into(),
            })
            .await
            .expect("login");

        let second = service.refresh(&first.refresh_token).await.expect("refresh");
        assert_ne!(first.refresh_token, second.refresh_token);

        // 회전 이후 이전 refresh 토큰은 무효
        assert!(service.refresh(&first.refresh_token).await.is_err());
        // 최신 토큰은 계속 사용 가능
        assert!(service.refresh(&second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn refresh_after_logout_fails() {
        let (service, _store) = service_with_user().await;

        let outcome = service
            .login(Credential::Password {
                email: "user@example.com".into(),
                password: "password1".into(),
            })
            .await
            .expect("login");

        service.logout("user@example.com").await.expect("logout");
        service.logout("user@example.com").await.expect("logout is idempotent");

        let err = service.refresh(&outcome.refresh_token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn forged_refresh_token_fails_before_store_lookup() {
        let (service, _store) = service_with_user().await;

        let err = service.refresh("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn kakao_resolution_is_idempotent() {
        let store = Arc::new(MemoryUserStore::new());
        let service = AuthService::new(&test_config(), store.clone()).expect("service");

        let first = service
            .resolve_kakao_user(&kakao_profile(777))
            .await
            .expect("first resolve creates");
        let second = service
            .resolve_kakao_user(&kakao_profile(777))
            .await
            .expect("second resolve finds");

        assert_eq!(first, second);
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn kakao_provisioning_collision_is_conflict() {
        let (service, _store) = service_with_user().await;

        // 같은 이메일의 로컬 계정이 이미 있는 상태에서 카카오 신규 가입 시도
        let mut profile = kakao_profile(888);
        profile.kakao_account.email = Some("user@example.com".into());

        let err = service.resolve_kakao_user(&profile).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn kakao_profile_without_email_cannot_provision() {
        let store = Arc::new(MemoryUserStore::new());
        let service = AuthService::new(&test_config(), store).expect("service");

        let mut profile = kakao_profile(999);
        profile.kakao_account.email = None;

        let err = service.resolve_kakao_user(&profile).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
