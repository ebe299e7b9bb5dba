//! 인증번호/임시 비밀번호 생성기

use rand::Rng;

/// SMS 인증번호 자릿수
pub const AUTH_CODE_LEN: usize = 4;

/// 소셜 가입 계정에 채워 넣는 임시 비밀번호 길이
pub const RANDOM_PASSWORD_LEN: usize = 12;

const DIGITS: &[u8] = b"0123456789";
const PASSWORD_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 균등 분포의 숫자 인증번호를 생성합니다.
///
/// SMS OTP 위협 모델에서는 암호학적 난수까지는 요구하지 않습니다.
pub fn numeric_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| DIGITS[rng.gen_range(0..DIGITS.len())] as char)
        .collect()
}

/// 영숫자 임시 비밀번호를 생성합니다.
///
/// 소셜 로그인으로 만들어지는 계정에 저장할 값으로, 사용자에게 노출되지 않습니다.
pub fn random_password(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| PASSWORD_CHARS[rng.gen_range(0..PASSWORD_CHARS.len())] as char)
        .collect()
}
