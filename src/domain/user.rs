// ==========================================
// 人事档案系统 - 用户账号模型
// ==========================================
// 说明: 用户注册表属于外部协作方，导入管道只读取存在性，
//       并对 is_verified 做单字段更新
// ==========================================

use crate::domain::types::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// 新建未验证账号（角色默认 USER）
    pub fn new(username: &str, email: &str) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.trim().to_lowercase(),
            email: email.trim().to_lowercase(),
            role: Role::User,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}
