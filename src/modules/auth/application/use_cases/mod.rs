pub mod current_user;
pub mod login_user;
pub mod register_user;
pub mod update_user;

pub use current_user::{CurrentUserError, CurrentUserUseCase, ICurrentUserUseCase};
pub use login_user::{ILoginUserUseCase, LoginError, LoginRequest, LoginUserResponse, LoginUserUseCase};
pub use register_user::{
    IRegisterUserUseCase, RegisterUser, RegisterUserError, RegisterUserUseCase, RoleGrant,
};
pub use update_user::{IUpdateUserUseCase, UpdateUser, UpdateUserError, UpdateUserUseCase};
