mod auth_dto;

pub use auth_dto::{
    AuthResponseDto, AuthUserDto, GoogleLoginQuery, GoogleLoginResponseDto, LoginRequestDto,
    ProfileResponseDto, RegisterRequestDto, SetPasswordRequestDto,
};
